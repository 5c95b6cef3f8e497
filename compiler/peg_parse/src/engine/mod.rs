//! Grammar interpretation.
//!
//! The engine walks a grammar value recursively. Every evaluation takes a
//! byte position and returns a [`Step`]: either where the match ended plus
//! the fragments it produced, or failure. Failure never consumes input, so
//! backtracking is simply retrying from the saved position.
//!
//! # Result shaping
//!
//! - Terminals produce one text fragment.
//! - Named rules reduce their fragments into one node fragment. A named
//!   rule that matched nothing contributes nothing.
//! - Anonymous rules pass their fragments through to the enclosing rule.
//! - Predicates contribute nothing.
//!
//! # Whitespace
//!
//! A terminal skips leading whitespace when it asks to, or when any rule
//! above it on the current path does. The flag is threaded down the
//! recursion and only ever turned on.
//!
//! Grammar recursion becomes Rust recursion, so rule evaluation goes through
//! [`ensure_sufficient_stack`].

use crate::failure::{FailureTracker, ParseFailure};
use crate::options::ParseOptions;
use crate::reduce::{reduce, Fragment};
use peg_ir::{AstNode, Combinator, Expr, Fidelity, Forward, NonTerminal, Terminal};
use peg_stack::ensure_sufficient_stack;
use std::sync::Arc;
use tracing::{trace, warn};

/// Result of evaluating one grammar value at one position.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step<'s> {
    Matched {
        end: usize,
        fragments: Vec<Fragment<'s>>,
    },
    Failed,
}

impl Step<'_> {
    /// Success that consumed nothing and produced nothing.
    fn empty(at: usize) -> Self {
        Step::Matched {
            end: at,
            fragments: Vec::new(),
        }
    }

    fn is_match(&self) -> bool {
        matches!(self, Step::Matched { .. })
    }
}

/// Interpreter state for one parse call.
pub(crate) struct Engine<'s, 'o> {
    source: &'s str,
    options: &'o ParseOptions,
    tracker: FailureTracker,
    /// Nesting depth of predicate probes; failures are not recorded inside.
    quiet: u32,
}

impl<'s, 'o> Engine<'s, 'o> {
    pub(crate) fn new(source: &'s str, options: &'o ParseOptions, start: usize) -> Self {
        Engine {
            source,
            options,
            tracker: FailureTracker::new(start),
            quiet: 0,
        }
    }

    /// Parse `grammar` as a root at `start`, returning the end position and
    /// the root node.
    ///
    /// The root is always reduced, even when anonymous or empty.
    pub(crate) fn run(&mut self, grammar: &Expr, start: usize) -> Option<(usize, AstNode)> {
        match grammar {
            Expr::Terminal(terminal) => {
                self.finish_root(terminal.name(), Fidelity::Flatten, |engine| {
                    engine.eval_terminal(terminal, start, false)
                })
            }
            Expr::Rule(rule) => self.finish_root(rule.name(), rule.fidelity(), |engine| {
                engine.eval_combinator(rule, start, false)
            }),
            Expr::Forward(forward) => {
                let rule = resolve(forward)?;
                self.finish_root(rule.name(), rule.fidelity(), |engine| {
                    engine.eval_combinator(rule, start, false)
                })
            }
        }
    }

    fn finish_root(
        &mut self,
        name: &Arc<str>,
        fidelity: Fidelity,
        eval: impl FnOnce(&mut Self) -> Step<'s>,
    ) -> Option<(usize, AstNode)> {
        match eval(self) {
            Step::Matched { end, fragments } => Some((end, reduce(name, fidelity, fragments))),
            Step::Failed => None,
        }
    }

    /// Record that the parse stopped at `end` while end of input was
    /// required.
    pub(crate) fn expect_end(&mut self, end: usize) {
        if self.options.diagnostics {
            self.tracker.record(end, &Arc::from("end of input"));
        }
    }

    pub(crate) fn into_failure(self) -> ParseFailure {
        self.tracker.into_failure(self.source)
    }

    // === Evaluation ===

    /// Evaluate `expr` at `pos`. `skip` is set when an enclosing rule skips
    /// whitespace.
    fn eval(&mut self, expr: &Expr, pos: usize, skip: bool) -> Step<'s> {
        match expr {
            Expr::Terminal(terminal) => self.eval_terminal(terminal, pos, skip),
            Expr::Rule(rule) => self.eval_rule(rule, pos, skip),
            Expr::Forward(forward) => match resolve(forward) {
                Some(rule) => self.eval_rule(rule, pos, skip),
                None => Step::Failed,
            },
        }
    }

    fn eval_terminal(&mut self, terminal: &Terminal, pos: usize, skip: bool) -> Step<'s> {
        let source = self.source;
        let at = if skip || terminal.skips_whitespace() {
            let rest = &source[pos..];
            pos + (rest.len() - rest.trim_start().len())
        } else {
            pos
        };

        match terminal.pattern().match_prefix(&source[at..]) {
            Some(len) => Step::Matched {
                end: at + len,
                fragments: vec![Fragment::Text {
                    name: Arc::clone(terminal.name()),
                    text: &source[at..at + len],
                }],
            },
            None => {
                self.record_expected(at, terminal.name());
                Step::Failed
            }
        }
    }

    fn eval_rule(&mut self, rule: &NonTerminal, pos: usize, skip: bool) -> Step<'s> {
        let step = ensure_sufficient_stack(|| self.eval_combinator(rule, pos, skip));
        match step {
            Step::Matched { end, fragments } if !rule.is_anonymous() && !fragments.is_empty() => {
                let node = reduce(rule.name(), rule.fidelity(), fragments);
                Step::Matched {
                    end,
                    fragments: vec![Fragment::Node(node)],
                }
            }
            other => other,
        }
    }

    fn eval_combinator(&mut self, rule: &NonTerminal, pos: usize, skip: bool) -> Step<'s> {
        let skip = skip || rule.skips_whitespace();
        trace!(rule = %rule.name(), pos, skip, "enter");
        let step = match rule.combinator() {
            Combinator::Sequence(children) => self.eval_sequence(children, pos, skip),
            Combinator::OrderedChoice(children) => self.eval_choice(children, pos, skip),
            Combinator::ZeroOrMore(child) => self.eval_repeat(child, pos, 0, skip),
            Combinator::OneOrMore(child) => self.eval_repeat(child, pos, 1, skip),
            Combinator::Optional(child) => match self.eval(child, pos, skip) {
                Step::Failed => Step::empty(pos),
                matched => matched,
            },
            Combinator::AndPredicate(child) => {
                if self.probe(child, pos, skip) {
                    Step::empty(pos)
                } else {
                    Step::Failed
                }
            }
            Combinator::NotPredicate(child) => {
                if self.probe(child, pos, skip) {
                    Step::Failed
                } else {
                    Step::empty(pos)
                }
            }
        };
        match &step {
            Step::Matched { end, .. } => trace!(rule = %rule.name(), pos, end, "matched"),
            Step::Failed => trace!(rule = %rule.name(), pos, "failed"),
        }
        step
    }

    fn eval_sequence(&mut self, children: &[Expr], start: usize, skip: bool) -> Step<'s> {
        let mut pos = start;
        let mut fragments = Vec::new();
        for child in children {
            match self.eval(child, pos, skip) {
                Step::Matched {
                    end,
                    fragments: more,
                } => {
                    pos = end;
                    fragments.extend(more);
                }
                Step::Failed => return Step::Failed,
            }
        }
        Step::Matched {
            end: pos,
            fragments,
        }
    }

    fn eval_choice(&mut self, children: &[Expr], start: usize, skip: bool) -> Step<'s> {
        for child in children {
            let step = self.eval(child, start, skip);
            if step.is_match() {
                return step;
            }
        }
        Step::Failed
    }

    /// Greedy repetition of `child`, needing at least `min` iterations.
    ///
    /// An iteration that fails or consumes nothing ends the loop, so a child
    /// that can match the empty string cannot spin forever.
    fn eval_repeat(&mut self, child: &Expr, start: usize, min: usize, skip: bool) -> Step<'s> {
        let mut pos = start;
        let mut count = 0;
        let mut fragments = Vec::new();
        loop {
            if count > 0 && pos == self.source.len() {
                break;
            }
            match self.eval(child, pos, skip) {
                Step::Matched {
                    end,
                    fragments: more,
                } if end > pos => {
                    pos = end;
                    count += 1;
                    fragments.extend(more);
                }
                _ => break,
            }
        }
        trace!(start, end = pos, count, "repetition stopped");

        if count < min {
            Step::Failed
        } else {
            Step::Matched {
                end: pos,
                fragments,
            }
        }
    }

    /// Evaluate `child` for its verdict alone.
    fn probe(&mut self, child: &Expr, pos: usize, skip: bool) -> bool {
        self.quiet += 1;
        let matched = self.eval(child, pos, skip).is_match();
        self.quiet -= 1;
        matched
    }

    fn record_expected(&mut self, pos: usize, what: &Arc<str>) {
        if self.quiet == 0 && self.options.diagnostics {
            self.tracker.record(pos, what);
        }
    }
}

fn resolve(forward: &Forward) -> Option<&Arc<NonTerminal>> {
    let rule = forward.target();
    if rule.is_none() {
        warn!(
            rule = %forward.name(),
            "forward reference was never defined; treating as failure"
        );
    }
    rule
}
