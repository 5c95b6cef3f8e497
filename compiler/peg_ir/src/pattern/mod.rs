//! Prefix matchers backing grammar terminals.
//!
//! The engine only relies on one question: "does this pattern match a prefix
//! of this text, and how long is the match?". [`PrefixMatcher`] is that
//! contract. Two adapters are provided:
//!
//! - [`RegexPattern`]: a regular expression anchored at the probe position.
//! - [`LiteralPattern`]: an exact string.
//!
//! Callers may plug in their own matcher with [`Pattern::custom`].

use crate::GrammarError;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// The pattern-matching capability a terminal delegates to.
pub trait PrefixMatcher: fmt::Debug + Send + Sync {
    /// Byte length of the match at the very start of `text`, if any.
    ///
    /// A zero-length match is a success.
    fn match_prefix(&self, text: &str) -> Option<usize>;

    /// The pattern as written, for diagnostics and default names.
    fn source(&self) -> &str;
}

/// A shared, immutable handle to a prefix matcher.
#[derive(Clone, Debug)]
pub struct Pattern {
    matcher: Arc<dyn PrefixMatcher>,
}

impl Pattern {
    /// Compile a regular expression.
    pub fn regex(source: &str) -> Result<Self, GrammarError> {
        Ok(Self::custom(RegexPattern::new(source)?))
    }

    /// Match `text` exactly.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::custom(LiteralPattern::new(text))
    }

    pub fn custom(matcher: impl PrefixMatcher + 'static) -> Self {
        Pattern {
            matcher: Arc::new(matcher),
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        self.matcher.source()
    }

    /// Probe the matcher.
    ///
    /// Lengths past the end of `text` or inside a UTF-8 sequence break the
    /// matcher contract and are reported as no match.
    pub fn match_prefix(&self, text: &str) -> Option<usize> {
        let len = self.matcher.match_prefix(text)?;
        if len <= text.len() && text.is_char_boundary(len) {
            Some(len)
        } else {
            tracing::warn!(
                pattern = self.source(),
                len,
                "matcher reported a length outside the input; treating as no match"
            );
            None
        }
    }
}

/// Regular expression compiled as `\A(?:source)`.
///
/// Alternation is leftmost-first, so `a|ab` against `"abc"` matches `"a"`.
#[derive(Clone, Debug)]
pub struct RegexPattern {
    source: String,
    regex: Regex,
}

impl RegexPattern {
    pub fn new(source: &str) -> Result<Self, GrammarError> {
        let regex = Regex::new(&format!(r"\A(?:{source})")).map_err(|err| {
            GrammarError::InvalidPattern {
                pattern: source.to_owned(),
                message: err.to_string(),
            }
        })?;
        Ok(RegexPattern {
            source: source.to_owned(),
            regex,
        })
    }
}

impl PrefixMatcher for RegexPattern {
    fn match_prefix(&self, text: &str) -> Option<usize> {
        self.regex.find(text).map(|m| m.end())
    }

    fn source(&self) -> &str {
        &self.source
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteralPattern {
    literal: String,
}

impl LiteralPattern {
    pub fn new(literal: impl Into<String>) -> Self {
        LiteralPattern {
            literal: literal.into(),
        }
    }
}

impl PrefixMatcher for LiteralPattern {
    fn match_prefix(&self, text: &str) -> Option<usize> {
        text.starts_with(self.literal.as_str())
            .then_some(self.literal.len())
    }

    fn source(&self) -> &str {
        &self.literal
    }
}
