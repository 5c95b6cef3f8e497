//! Grammar construction errors.
//!
//! Every variant is raised while a grammar is being built. Parsing never
//! produces a `GrammarError`; parse failures are ordinary values.

use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// Malformed combinator arguments: no children, too many children for a
    /// unary combinator, or an empty rule name.
    #[error("invalid grammar for `{rule}`: {reason}")]
    InvalidGrammar { rule: Arc<str>, reason: String },

    /// A named rule was defined twice in the same registry.
    #[error("duplicate symbol `{name}`")]
    DuplicateSymbol { name: Arc<str> },

    /// A terminal pattern failed to compile.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A rule was declared for forward reference but never defined.
    #[error("rule `{name}` was declared but never defined")]
    UnresolvedRule { name: Arc<str> },
}

impl GrammarError {
    pub(crate) fn invalid(rule: &str, reason: impl Into<String>) -> Self {
        GrammarError::InvalidGrammar {
            rule: Arc::from(rule),
            reason: reason.into(),
        }
    }
}
