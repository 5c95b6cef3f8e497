//! Parse failure diagnostics.
//!
//! The engine reports every failed terminal probe to a [`FailureTracker`],
//! which keeps only the furthest position reached and the set of things
//! expected there. Probes inside predicates are not reported, since a
//! predicate failing is often the point.

use std::fmt;
use std::sync::Arc;

/// Characters of input quoted in a failure message.
const FOUND_WIDTH: usize = 10;

/// 1-based line and column (in characters) of a byte offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Locate byte `offset` in `source`. `offset` must be a char boundary.
    pub fn of(source: &str, offset: usize) -> Self {
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
        let column = before[line_start..].chars().count() + 1;
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Why a parse did not produce an AST.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseFailure {
    furthest: usize,
    location: Location,
    expected: Vec<String>,
    found: Option<String>,
}

impl ParseFailure {
    /// Byte offset of the furthest failed probe.
    pub fn furthest(&self) -> usize {
        self.furthest
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Names of the terminals that could have continued the parse at
    /// [`furthest`](Self::furthest), in the order they were tried.
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    /// Up to ten characters of input at the failure, `None` at end of input.
    pub fn found(&self) -> Option<&str> {
        self.found.as_deref()
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: unexpected ", self.location)?;
        match &self.found {
            Some(found) => write!(f, "`{found}`")?,
            None => f.write_str("end of input")?,
        }
        if let Some((last, rest)) = self.expected.split_last() {
            f.write_str(", expecting ")?;
            for (i, item) in rest.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "`{item}`")?;
            }
            if !rest.is_empty() {
                f.write_str(" or ")?;
            }
            write!(f, "`{last}`")?;
        }
        f.write_str(".")
    }
}

impl std::error::Error for ParseFailure {}

/// Furthest-failure bookkeeping for one parse.
#[derive(Debug)]
pub(crate) struct FailureTracker {
    furthest: usize,
    expected: Vec<Arc<str>>,
}

impl FailureTracker {
    pub(crate) fn new(start: usize) -> Self {
        FailureTracker {
            furthest: start,
            expected: Vec::new(),
        }
    }

    /// Note that `what` was expected at `pos` and not found.
    pub(crate) fn record(&mut self, pos: usize, what: &Arc<str>) {
        if pos < self.furthest {
            return;
        }
        if pos > self.furthest {
            self.furthest = pos;
            self.expected.clear();
        }
        if !self.expected.iter().any(|seen| seen == what) {
            self.expected.push(Arc::clone(what));
        }
    }

    pub(crate) fn into_failure(self, source: &str) -> ParseFailure {
        let rest = &source[self.furthest..];
        let found = (!rest.is_empty()).then(|| rest.chars().take(FOUND_WIDTH).collect());
        ParseFailure {
            furthest: self.furthest,
            location: Location::of(source, self.furthest),
            expected: self.expected.iter().map(ToString::to_string).collect(),
            found,
        }
    }
}
