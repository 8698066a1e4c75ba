//! Content extraction errors.

/// An upstream answered successfully but the answer held nothing usable
/// (no video URL, no text).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Extraction Error: {} at line {} in {}", message, line, file)]
pub struct ExtractionError {
    /// What could not be extracted, and from where
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ExtractionError {
    /// Create a new ExtractionError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::ExtractionError;
    ///
    /// let err = ExtractionError::new("no video URL in upstream reply");
    /// assert!(err.to_string().contains("no video URL"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
