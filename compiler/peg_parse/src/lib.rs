//! PEG parser engine.
//!
//! Interprets grammars built with [`peg_ir::GrammarBuilder`] against input
//! text. A parse is a pure function of the grammar and the input: the same
//! pair always yields the same [`ParseOutput`], and one grammar can serve
//! any number of parses on any number of threads.
//!
//! # Outcome
//!
//! A parse matches a *prefix* of the input. [`ParseOutput::remaining`] is
//! the unconsumed suffix on success and the whole input on failure. Use
//! [`ParseOptions::requiring_complete`] to treat leftover input as failure.
//!
//! # Tracing
//!
//! - `RUST_LOG=peg_parse=debug`: one event per parse with its outcome.
//! - `RUST_LOG=peg_parse=trace`: rule entry and exit (very verbose).
//! - `RUST_LOG=peg_ir=debug`: rule registration and forward resolution.
//!
//! Call [`init_tracing`] once to install a subscriber reading `RUST_LOG`.

mod engine;
mod failure;
mod options;
pub mod reduce;

pub use failure::{Location, ParseFailure};
pub use options::ParseOptions;

use engine::Engine;
use peg_ir::{AstNode, Expr};
use std::sync::Once;
use tracing::debug;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once; later calls do nothing. An already
/// installed global subscriber is left in place.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .try_init();
            if let Err(err) = installed {
                debug!(%err, "keeping the existing global subscriber");
            }
        }
    });
}

// === Entry points ===

/// Result of parsing with one grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOutput<'s> {
    /// Input left over after the match; all of it on failure.
    pub remaining: &'s str,
    pub result: Result<AstNode, ParseFailure>,
}

impl ParseOutput<'_> {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Success with no input left over.
    pub fn is_complete(&self) -> bool {
        self.is_success() && self.remaining.is_empty()
    }

    /// Bytes of `source` the match covered. `source` must be the input this
    /// output was produced from.
    pub fn consumed(&self, source: &str) -> usize {
        source.len() - self.remaining.len()
    }

    pub fn ast(&self) -> Option<&AstNode> {
        self.result.as_ref().ok()
    }

    pub fn failure(&self) -> Option<&ParseFailure> {
        self.result.as_ref().err()
    }

    pub fn into_result(self) -> Result<AstNode, ParseFailure> {
        self.result
    }
}

/// Parse a prefix of `source` with `grammar` using default options.
pub fn parse<'s>(source: &'s str, grammar: &Expr) -> ParseOutput<'s> {
    parse_with(source, grammar, &ParseOptions::default())
}

/// Parse a prefix of `source` with `grammar`.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(grammar = %grammar.name(), len = source.len())
)]
pub fn parse_with<'s>(source: &'s str, grammar: &Expr, options: &ParseOptions) -> ParseOutput<'s> {
    let mut engine = Engine::new(source, options, 0);
    match engine.run(grammar, 0) {
        Some((end, ast)) if !options.require_complete || end == source.len() => {
            debug!(consumed = end, "parse succeeded");
            return ParseOutput {
                remaining: &source[end..],
                result: Ok(ast),
            };
        }
        Some((end, _)) => {
            debug!(consumed = end, "parse stopped before end of input");
            engine.expect_end(end);
        }
        None => {}
    }

    let failure = engine.into_failure();
    debug!(furthest = failure.furthest(), "parse failed");
    ParseOutput {
        remaining: source,
        result: Err(failure),
    }
}

/// Result of [`parse_each`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOutput<'s> {
    /// Input left after the last successful grammar.
    pub remaining: &'s str,
    /// One node per grammar that matched, in order.
    pub nodes: Vec<AstNode>,
    /// Why the first failing grammar failed, if one did.
    pub failure: Option<ParseFailure>,
}

impl BatchOutput<'_> {
    /// Every grammar that ran matched and the input was used up.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.remaining.is_empty()
    }
}

/// Apply `grammars` one after another, each continuing where the previous
/// one stopped.
///
/// Stops at the first failure, or early once the input is used up.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(grammars = grammars.len(), len = source.len())
)]
pub fn parse_each<'s>(source: &'s str, grammars: &[Expr]) -> BatchOutput<'s> {
    let options = ParseOptions::default();
    let mut pos = 0;
    let mut nodes = Vec::with_capacity(grammars.len());

    for grammar in grammars {
        if pos == source.len() {
            debug!(parsed = nodes.len(), "input exhausted");
            break;
        }
        let mut engine = Engine::new(source, &options, pos);
        match engine.run(grammar, pos) {
            Some((end, ast)) => {
                pos = end;
                nodes.push(ast);
            }
            None => {
                debug!(grammar = %grammar.name(), pos, "grammar failed");
                return BatchOutput {
                    remaining: &source[pos..],
                    nodes,
                    failure: Some(engine.into_failure()),
                };
            }
        }
    }

    BatchOutput {
        remaining: &source[pos..],
        nodes,
        failure: None,
    }
}
