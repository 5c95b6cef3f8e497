//! Grammar values.
//!
//! A grammar is a graph of [`Expr`] values: [`Terminal`] leaves and
//! [`NonTerminal`] combinator nodes, plus [`Forward`] placeholders for rules
//! referenced before they are defined. Everything is immutable once built and
//! shared through `Arc`, so one grammar can serve concurrent parses.

use crate::{GrammarError, Pattern};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// How a non-terminal reduces the fragments its children matched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Fidelity {
    /// Collapse everything into one string.
    Flatten,
    /// Keep child nodes as a list.
    #[default]
    Structured,
}

/// The closed set of combinators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CombinatorKind {
    Sequence,
    OrderedChoice,
    ZeroOrMore,
    OneOrMore,
    Optional,
    AndPredicate,
    NotPredicate,
}

impl CombinatorKind {
    /// Kinds that take exactly one child.
    pub fn is_unary(self) -> bool {
        !matches!(self, CombinatorKind::Sequence | CombinatorKind::OrderedChoice)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CombinatorKind::Sequence => "sequence",
            CombinatorKind::OrderedChoice => "ordered_choice",
            CombinatorKind::ZeroOrMore => "zero_or_more",
            CombinatorKind::OneOrMore => "one_or_more",
            CombinatorKind::Optional => "optional",
            CombinatorKind::AndPredicate => "and_predicate",
            CombinatorKind::NotPredicate => "not_predicate",
        }
    }
}

impl fmt::Display for CombinatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A combinator together with its children.
#[derive(Clone, Debug)]
pub enum Combinator {
    Sequence(Vec<Expr>),
    OrderedChoice(Vec<Expr>),
    ZeroOrMore(Expr),
    OneOrMore(Expr),
    Optional(Expr),
    AndPredicate(Expr),
    NotPredicate(Expr),
}

impl Combinator {
    /// Build a combinator of `kind`, validating the child count.
    pub fn new(
        rule: &str,
        kind: CombinatorKind,
        children: Vec<Expr>,
    ) -> Result<Self, GrammarError> {
        if children.is_empty() {
            return Err(GrammarError::invalid(
                rule,
                format!("`{kind}` requires at least one child"),
            ));
        }

        Ok(match kind {
            CombinatorKind::Sequence => Combinator::Sequence(children),
            CombinatorKind::OrderedChoice => Combinator::OrderedChoice(children),
            CombinatorKind::ZeroOrMore => {
                Combinator::ZeroOrMore(only_child(rule, kind, children)?)
            }
            CombinatorKind::OneOrMore => Combinator::OneOrMore(only_child(rule, kind, children)?),
            CombinatorKind::Optional => Combinator::Optional(only_child(rule, kind, children)?),
            CombinatorKind::AndPredicate => {
                Combinator::AndPredicate(only_child(rule, kind, children)?)
            }
            CombinatorKind::NotPredicate => {
                Combinator::NotPredicate(only_child(rule, kind, children)?)
            }
        })
    }

    pub fn kind(&self) -> CombinatorKind {
        match self {
            Combinator::Sequence(_) => CombinatorKind::Sequence,
            Combinator::OrderedChoice(_) => CombinatorKind::OrderedChoice,
            Combinator::ZeroOrMore(_) => CombinatorKind::ZeroOrMore,
            Combinator::OneOrMore(_) => CombinatorKind::OneOrMore,
            Combinator::Optional(_) => CombinatorKind::Optional,
            Combinator::AndPredicate(_) => CombinatorKind::AndPredicate,
            Combinator::NotPredicate(_) => CombinatorKind::NotPredicate,
        }
    }

    pub fn children(&self) -> &[Expr] {
        match self {
            Combinator::Sequence(children) | Combinator::OrderedChoice(children) => children,
            Combinator::ZeroOrMore(child)
            | Combinator::OneOrMore(child)
            | Combinator::Optional(child)
            | Combinator::AndPredicate(child)
            | Combinator::NotPredicate(child) => std::slice::from_ref(child),
        }
    }
}

fn only_child(
    rule: &str,
    kind: CombinatorKind,
    children: Vec<Expr>,
) -> Result<Expr, GrammarError> {
    let count = children.len();
    let mut children = children.into_iter();
    match (children.next(), children.next()) {
        (Some(child), None) => Ok(child),
        _ => Err(GrammarError::invalid(
            rule,
            format!("`{kind}` takes exactly one child, got {count}"),
        )),
    }
}

/// Name of a rule as given to a constructor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeName<'a> {
    Named(&'a str),
    /// An intermediate node; the registry assigns it a unique key.
    Anonymous,
}

impl<'a> From<&'a str> for NodeName<'a> {
    fn from(name: &'a str) -> Self {
        NodeName::Named(name)
    }
}

/// Registry key of a non-terminal.
///
/// Anonymous keys are a separate variant, so they cannot collide with any
/// user-chosen name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKey {
    Named(Arc<str>),
    Anonymous(u32),
}

impl SymbolKey {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, SymbolKey::Anonymous(_))
    }
}

/// Named keys render as the name, anonymous keys as `#n`.
impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKey::Named(name) => f.write_str(name),
            SymbolKey::Anonymous(id) => write!(f, "#{id}"),
        }
    }
}

/// A grammar leaf: one pattern probe.
#[derive(Clone, Debug)]
pub struct Terminal {
    name: Arc<str>,
    pattern: Pattern,
    skip_whitespace: bool,
}

impl Terminal {
    /// A terminal named after its pattern source.
    pub fn new(pattern: Pattern) -> Self {
        Terminal {
            name: Arc::from(pattern.source()),
            pattern,
            skip_whitespace: false,
        }
    }

    pub fn regex(source: &str) -> Result<Self, GrammarError> {
        Ok(Self::new(Pattern::regex(source)?))
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(Pattern::literal(text))
    }

    /// Name used for the AST nodes this terminal produces.
    #[must_use]
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Skip leading whitespace before probing the pattern.
    ///
    /// Skipped whitespace is consumed on success but is not part of the
    /// matched text.
    #[must_use]
    pub fn skipping_whitespace(mut self) -> Self {
        self.skip_whitespace = true;
        self
    }

    #[inline]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    #[inline]
    pub fn skips_whitespace(&self) -> bool {
        self.skip_whitespace
    }
}

/// A combinator node.
#[derive(Debug)]
pub struct NonTerminal {
    key: SymbolKey,
    name: Arc<str>,
    combinator: Combinator,
    fidelity: Fidelity,
    skip_whitespace: bool,
}

impl NonTerminal {
    pub fn new(key: SymbolKey, combinator: Combinator, fidelity: Fidelity) -> Self {
        let name = match &key {
            SymbolKey::Named(name) => Arc::clone(name),
            SymbolKey::Anonymous(_) => Arc::from(key.to_string()),
        };
        NonTerminal {
            key,
            name,
            combinator,
            fidelity,
            skip_whitespace: false,
        }
    }

    /// Make every terminal below this node skip leading whitespace.
    ///
    /// The setting is inherited through nested rules and forward
    /// references. It only adds skipping; a descendant cannot turn it off.
    #[must_use]
    pub fn skipping_whitespace(mut self) -> Self {
        self.skip_whitespace = true;
        self
    }

    #[inline]
    pub fn key(&self) -> &SymbolKey {
        &self.key
    }

    /// The rule name, or `#n` for anonymous nodes.
    #[inline]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.key.is_anonymous()
    }

    #[inline]
    pub fn combinator(&self) -> &Combinator {
        &self.combinator
    }

    #[inline]
    pub fn fidelity(&self) -> Fidelity {
        self.fidelity
    }

    #[inline]
    pub fn skips_whitespace(&self) -> bool {
        self.skip_whitespace
    }
}

/// Placeholder for a named rule that is referenced before it is defined.
///
/// Resolved at most once. The link is strong, so any [`Expr`] that reaches
/// the placeholder keeps the rule alive without the registry. A recursive
/// rule is therefore a reference cycle and lives until the process exits.
#[derive(Debug)]
pub struct Forward {
    name: Arc<str>,
    target: OnceLock<Arc<NonTerminal>>,
}

impl Forward {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Forward {
            name: name.into(),
            target: OnceLock::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Point this placeholder at `rule`. Returns `false` if it was already
    /// resolved.
    pub fn resolve(&self, rule: &Arc<NonTerminal>) -> bool {
        self.target.set(Arc::clone(rule)).is_ok()
    }

    pub fn is_resolved(&self) -> bool {
        self.target.get().is_some()
    }

    /// The rule this placeholder stands for, once resolved.
    #[inline]
    pub fn target(&self) -> Option<&Arc<NonTerminal>> {
        self.target.get()
    }
}

/// A grammar value: what callers compose and hand to the parser.
#[derive(Clone, Debug)]
pub enum Expr {
    Terminal(Arc<Terminal>),
    Rule(Arc<NonTerminal>),
    Forward(Arc<Forward>),
}

impl Expr {
    /// Terminal or rule name.
    pub fn name(&self) -> &str {
        match self {
            Expr::Terminal(terminal) => terminal.name(),
            Expr::Rule(rule) => rule.name(),
            Expr::Forward(forward) => forward.name(),
        }
    }
}

impl From<Terminal> for Expr {
    fn from(terminal: Terminal) -> Self {
        Expr::Terminal(Arc::new(terminal))
    }
}

impl From<Arc<NonTerminal>> for Expr {
    fn from(rule: Arc<NonTerminal>) -> Self {
        Expr::Rule(rule)
    }
}

impl From<Arc<Forward>> for Expr {
    fn from(forward: Arc<Forward>) -> Self {
        Expr::Forward(forward)
    }
}
