//! Stack growth for recursive grammar evaluation.
//!
//! The parser engine walks a grammar by recursion: every non-terminal is one
//! more level of native stack. Recursive grammars (nested parentheses, nested
//! lists) make that depth proportional to the nesting of the *input*, which a
//! caller does not control. Evaluation of each rule is therefore wrapped in
//! [`ensure_sufficient_stack`], which grows the stack on demand.
//!
//! - **Native targets**: `stacker::maybe_grow`.
//! - **WASM targets**: plain call, the runtime manages its own stack.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
///
/// ```text
/// fn eval_rule(&mut self, rule: &NonTerminal, pos: usize) -> Step<'s> {
///     ensure_sufficient_stack(|| self.eval_combinator(rule, pos))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM version: call `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
