//! Predefined terminals for common lexical classes.
//!
//! Each pattern is compiled once per process and shared. The terminals are
//! returned unconverted so callers can still rename them or turn on
//! whitespace skipping.

use crate::{Pattern, Terminal};
use std::sync::OnceLock;

const BREAKLINE: &str = r"\n";
const SPACE: &str = r"\s";
const NUMBER: &str = r"[+-]?[0-9]+\.?[0-9]*";
/// ASCII letters, hiragana, katakana, CJK ideographs and fullwidth `：`..`＠`.
const STRINGS: &str = r"[a-zA-Zぁ-んァ-ン一-龥：-＠]+";
/// One ASCII punctuation character.
const SYMBOLS: &str = r"[!-/:-@\[-`{-~]";

/// A single `\n`.
pub fn breakline() -> Terminal {
    static CELL: OnceLock<Pattern> = OnceLock::new();
    builtin(&CELL, BREAKLINE, "breakline")
}

/// A single whitespace character.
pub fn space() -> Terminal {
    static CELL: OnceLock<Pattern> = OnceLock::new();
    builtin(&CELL, SPACE, "space")
}

/// An optionally signed decimal number: `42`, `-7`, `3.14`, `+1.`.
pub fn number() -> Terminal {
    static CELL: OnceLock<Pattern> = OnceLock::new();
    builtin(&CELL, NUMBER, "number")
}

/// A run of letters.
pub fn strings() -> Terminal {
    static CELL: OnceLock<Pattern> = OnceLock::new();
    builtin(&CELL, STRINGS, "strings")
}

/// One ASCII punctuation character.
pub fn symbols() -> Terminal {
    static CELL: OnceLock<Pattern> = OnceLock::new();
    builtin(&CELL, SYMBOLS, "symbols")
}

fn builtin(cell: &'static OnceLock<Pattern>, source: &str, name: &str) -> Terminal {
    Terminal::new(cell.get_or_init(|| compile(source)).clone()).named(name)
}

#[expect(
    clippy::expect_used,
    reason = "Invariant: built-in patterns are valid regular expressions"
)]
fn compile(source: &str) -> Pattern {
    Pattern::regex(source).expect("built-in pattern compiles")
}

#[cfg(test)]
mod tests;
