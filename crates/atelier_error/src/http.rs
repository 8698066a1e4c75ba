//! Upstream HTTP error types.

/// Maximum number of characters of an upstream response body kept in an error.
pub const MAX_ERROR_BODY_CHARS: usize = 512;

/// Upstream HTTP failure with source location.
///
/// `status` is `None` for transport failures (connection refused, timeout, broken stream).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// Status code returned by the upstream, if a response arrived
    pub status: Option<u16>,
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a transport-level HttpError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::HttpError;
    ///
    /// let err = HttpError::new("Connection refused");
    /// assert!(err.message.contains("Connection refused"));
    /// assert_eq!(err.status, None);
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            status: None,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create an HttpError for a non-2xx response, truncating the body.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::{HttpError, MAX_ERROR_BODY_CHARS};
    ///
    /// let err = HttpError::with_status(500, "x".repeat(2000));
    /// assert_eq!(err.status, Some(500));
    /// assert!(err.message.len() < 2000);
    /// ```
    #[track_caller]
    pub fn with_status(status: u16, body: impl AsRef<str>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            status: Some(status),
            message: format!("upstream returned {}: {}", status, truncate(body.as_ref())),
            line: location.line(),
            file: location.file(),
        }
    }
}

fn truncate(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut out: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    out.push_str("...");
    out
}
