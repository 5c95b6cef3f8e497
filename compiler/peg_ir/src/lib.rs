//! PEG IR - grammar values, symbol registry and AST types.
//!
//! This crate holds everything the parser engine consumes and produces:
//! - Patterns: the prefix-matching capability behind terminals
//! - Grammar values: [`Terminal`], [`NonTerminal`], [`Forward`], [`Expr`]
//! - [`Registry`] and [`GrammarBuilder`] for constructing grammars
//! - [`AstNode`], the reduced parse output
//!
//! # Design Philosophy
//!
//! - **Immutable grammars**: once built, a grammar is shared read-only
//!   through `Arc` and can serve any number of concurrent parses.
//! - **Closed combinator set**: [`Combinator`] is an enum, so the engine
//!   matches on it exhaustively.
//! - **No global state**: names are unique per [`Registry`], and a registry
//!   belongs to one construction session.

pub mod ast;
mod builder;
pub mod builtins;
mod error;
mod expr;
mod pattern;
mod registry;

pub use ast::{AstNode, AstValue};
pub use builder::{Grammar, GrammarBuilder};
pub use error::GrammarError;
pub use expr::{
    Combinator, CombinatorKind, Expr, Fidelity, Forward, NodeName, NonTerminal, SymbolKey,
    Terminal,
};
pub use pattern::{LiteralPattern, Pattern, PrefixMatcher, RegexPattern};
pub use registry::Registry;
