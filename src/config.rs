/// Configuration types for reading drawing records and picture streams.
///
/// The defaults are lenient: malformed input degrades into diagnostics
/// wherever the rest of the document can still be read.
///
/// # Examples
///
/// ```rust
/// use litchi_drawing::ParseOptions;
///
/// // Create with defaults
/// let options = ParseOptions::default();
///
/// // Or customize
/// let options = ParseOptions::new()
///     .with_strict(true)
///     .with_max_depth(16);
/// assert!(options.strict);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Treat recoverable inconsistencies (truncated nested records, unknown
    /// picture types) as hard errors
    pub strict: bool,
    /// Maximum container nesting depth accepted by the record parser
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: 64,
        }
    }
}

impl ParseOptions {
    /// Create a new `ParseOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether recoverable inconsistencies abort parsing.
    #[inline]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the maximum container nesting depth.
    ///
    /// Legitimate drawings rarely nest deeper than a handful of groups; the
    /// limit bounds recursion on hostile input.
    #[inline]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
