//! Grammar construction.
//!
//! [`GrammarBuilder`] is the construction session: it owns the [`Registry`]
//! every rule is registered in and exposes one constructor per combinator.
//! Each constructor takes a [`NodeName`] (a `&str`, or
//! [`NodeName::Anonymous`] for intermediate nodes), a [`Fidelity`], and its
//! children.
//!
//! ```text
//! let g = GrammarBuilder::new();
//! let number = g.pattern("[0-9]+")?;
//! let plus = g.literal("+");
//! let add = g.sequence("add", Fidelity::Flatten, [number.clone(), plus, number])?;
//! let grammar = g.finish()?;
//! ```
//!
//! Recursive rules are written with [`GrammarBuilder::declare`]: the returned
//! placeholder can be used as a child right away and is resolved when a rule
//! of the same name is defined.
//!
//! [`GrammarBuilder::skipping`] builds a node whose terminals, at any depth,
//! skip leading whitespace.

use crate::{
    Combinator, CombinatorKind, Expr, Fidelity, GrammarError, NodeName, NonTerminal, Registry,
    SymbolKey, Terminal,
};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct GrammarBuilder {
    registry: Registry,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // === Terminals ===

    /// A regular-expression terminal named after its pattern.
    pub fn pattern(&self, source: &str) -> Result<Expr, GrammarError> {
        Ok(Terminal::regex(source)?.into())
    }

    /// A literal terminal named after its text.
    pub fn literal(&self, text: &str) -> Expr {
        Terminal::literal(text).into()
    }

    // === Non-terminals ===

    /// Build and register a non-terminal of any kind.
    pub fn non_terminal<'a>(
        &self,
        name: impl Into<NodeName<'a>>,
        kind: CombinatorKind,
        fidelity: Fidelity,
        children: impl IntoIterator<Item = Expr>,
    ) -> Result<Expr, GrammarError> {
        self.build(name.into(), kind, fidelity, children, false)
    }

    /// Like [`non_terminal`](Self::non_terminal), but every terminal below
    /// the node skips leading whitespace before matching.
    pub fn skipping<'a>(
        &self,
        name: impl Into<NodeName<'a>>,
        kind: CombinatorKind,
        fidelity: Fidelity,
        children: impl IntoIterator<Item = Expr>,
    ) -> Result<Expr, GrammarError> {
        self.build(name.into(), kind, fidelity, children, true)
    }

    fn build(
        &self,
        name: NodeName<'_>,
        kind: CombinatorKind,
        fidelity: Fidelity,
        children: impl IntoIterator<Item = Expr>,
        skip_whitespace: bool,
    ) -> Result<Expr, GrammarError> {
        let key = match name {
            NodeName::Named("") => {
                return Err(GrammarError::invalid("", "rule name must not be empty"));
            }
            NodeName::Named(name) => SymbolKey::Named(Arc::from(name)),
            NodeName::Anonymous => self.registry.next_anonymous(),
        };
        let combinator = Combinator::new(&key.to_string(), kind, children.into_iter().collect())?;
        let mut rule = NonTerminal::new(key, combinator, fidelity);
        if skip_whitespace {
            rule = rule.skipping_whitespace();
        }
        Ok(Expr::Rule(self.registry.register(rule)?))
    }

    /// All children in order.
    pub fn sequence<'a>(
        &self,
        name: impl Into<NodeName<'a>>,
        fidelity: Fidelity,
        children: impl IntoIterator<Item = Expr>,
    ) -> Result<Expr, GrammarError> {
        self.non_terminal(name, CombinatorKind::Sequence, fidelity, children)
    }

    /// The first child that matches.
    pub fn ordered_choice<'a>(
        &self,
        name: impl Into<NodeName<'a>>,
        fidelity: Fidelity,
        children: impl IntoIterator<Item = Expr>,
    ) -> Result<Expr, GrammarError> {
        self.non_terminal(name, CombinatorKind::OrderedChoice, fidelity, children)
    }

    pub fn zero_or_more<'a>(
        &self,
        name: impl Into<NodeName<'a>>,
        fidelity: Fidelity,
        child: Expr,
    ) -> Result<Expr, GrammarError> {
        self.non_terminal(name, CombinatorKind::ZeroOrMore, fidelity, [child])
    }

    pub fn one_or_more<'a>(
        &self,
        name: impl Into<NodeName<'a>>,
        fidelity: Fidelity,
        child: Expr,
    ) -> Result<Expr, GrammarError> {
        self.non_terminal(name, CombinatorKind::OneOrMore, fidelity, [child])
    }

    pub fn optional<'a>(
        &self,
        name: impl Into<NodeName<'a>>,
        fidelity: Fidelity,
        child: Expr,
    ) -> Result<Expr, GrammarError> {
        self.non_terminal(name, CombinatorKind::Optional, fidelity, [child])
    }

    /// Succeeds where `child` would, without consuming input.
    pub fn and_predicate<'a>(
        &self,
        name: impl Into<NodeName<'a>>,
        fidelity: Fidelity,
        child: Expr,
    ) -> Result<Expr, GrammarError> {
        self.non_terminal(name, CombinatorKind::AndPredicate, fidelity, [child])
    }

    /// Succeeds where `child` would fail, without consuming input.
    pub fn not_predicate<'a>(
        &self,
        name: impl Into<NodeName<'a>>,
        fidelity: Fidelity,
        child: Expr,
    ) -> Result<Expr, GrammarError> {
        self.non_terminal(name, CombinatorKind::NotPredicate, fidelity, [child])
    }

    // === Recursion ===

    /// A reference to the rule `name`, which may be defined later.
    pub fn declare(&self, name: &str) -> Result<Expr, GrammarError> {
        Ok(Expr::Forward(self.registry.declare(name)?))
    }

    /// End the session, checking every declared rule was defined.
    pub fn finish(self) -> Result<Grammar, GrammarError> {
        if let Some(name) = self.registry.unresolved().into_iter().next() {
            return Err(GrammarError::UnresolvedRule { name });
        }
        tracing::debug!(rules = self.registry.len(), "grammar complete");
        Ok(Grammar {
            registry: self.registry,
        })
    }
}

/// A finished grammar: every declared rule is defined.
///
/// Rules handed out by [`Grammar::rule`] own everything they reach, forward
/// references included, so they stay usable after the grammar is dropped.
#[derive(Debug)]
pub struct Grammar {
    registry: Registry,
}

impl Grammar {
    /// The rule named `name`, ready to hand to the parser.
    pub fn rule(&self, name: &str) -> Option<Expr> {
        self.registry.get(name).map(Expr::Rule)
    }

    /// Names of all named rules, sorted.
    pub fn names(&self) -> Vec<Arc<str>> {
        self.registry.names()
    }
}
