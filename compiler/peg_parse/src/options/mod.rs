//! Parse configuration.

/// Knobs for a single parse call.
///
/// ```text
/// let options = ParseOptions::new().requiring_complete();
/// let output = parse_with(source, &document, &options);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Report a success that leaves input unconsumed as a failure expecting
    /// end of input.
    pub require_complete: bool,
    /// Track the furthest failed terminal probe and what was expected there.
    pub diagnostics: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            require_complete: false,
            diagnostics: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requiring_complete(mut self) -> Self {
        self.require_complete = true;
        self
    }

    /// Skip failure tracking; failures then report only the start position.
    #[must_use]
    pub fn without_diagnostics(mut self) -> Self {
        self.diagnostics = false;
        self
    }
}
