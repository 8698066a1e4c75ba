//! Retry classification.

use crate::{AtelierError, AtelierErrorKind, HttpError};

/// Trait for errors that support retry logic.
///
/// Only the outbound HTTP call is ever retried; every other failure aborts the
/// generation attempt immediately.
///
/// # Examples
///
/// ```
/// use atelier_error::{HttpError, RetryableError};
///
/// assert!(HttpError::with_status(503, "overloaded").is_retryable());
/// assert!(HttpError::new("connection reset").is_retryable());
/// assert!(!HttpError::with_status(401, "bad key").is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for HttpError {
    fn is_retryable(&self) -> bool {
        match self.status {
            None => true,
            Some(status) => matches!(status, 408 | 429 | 500 | 502 | 503 | 504),
        }
    }
}

impl RetryableError for AtelierError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            AtelierErrorKind::Http(e) => e.is_retryable(),
            _ => false,
        }
    }
}
