//! Blocked prompt errors.

/// A prompt matched one or more blocklist rules.
///
/// The display form embeds every matched rule, in match order.
///
/// # Examples
///
/// ```
/// use atelier_error::BlockedPromptError;
///
/// let err = BlockedPromptError::new(vec!["word:cat".to_string(), "substr:dog".to_string()]);
/// assert!(err.to_string().contains("word:cat, substr:dog"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Blocked Prompt Error: prompt contains blocked terms: {} at line {} in {}",
    matched.join(", "),
    line,
    file
)]
pub struct BlockedPromptError {
    /// Raw rule lines that matched
    pub matched: Vec<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl BlockedPromptError {
    /// Create a new BlockedPromptError at the current location.
    #[track_caller]
    pub fn new(matched: Vec<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            matched,
            line: location.line(),
            file: location.file(),
        }
    }
}
