//! Top-level error wrapper types.

use crate::{
    BlockedPromptError, ConfigError, DisabledError, ExtractionError, HttpError, JsonError,
    NotFoundError, RequestError,
};

/// Every failure class a generation attempt can surface.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: AtelierError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AtelierErrorKind {
    /// Upstream HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Request rejected before any upstream call
    #[from(RequestError)]
    Request(RequestError),
    /// No usable content in an upstream reply
    #[from(ExtractionError)]
    Extraction(ExtractionError),
    /// Prompt rejected by the blocklist
    #[from(BlockedPromptError)]
    BlockedPrompt(BlockedPromptError),
    /// Channel or model switched off
    #[from(DisabledError)]
    Disabled(DisabledError),
    /// Channel or model unknown
    #[from(NotFoundError)]
    NotFound(NotFoundError),
}

/// Atelier error with kind discrimination.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierErrorKind, AtelierResult, ConfigError};
///
/// fn might_fail() -> AtelierResult<()> {
///     Err(ConfigError::new("Missing API key"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), AtelierErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Atelier Error: {}", _0)]
pub struct AtelierError(Box<AtelierErrorKind>);

impl AtelierError {
    /// Create a new error from a kind.
    pub fn new(kind: AtelierErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AtelierErrorKind {
        &self.0
    }

    /// True when the prompt was rejected by the blocklist.
    pub fn is_blocked_prompt(&self) -> bool {
        matches!(self.kind(), AtelierErrorKind::BlockedPrompt(_))
    }
}

// Generic From implementation for any type that converts to AtelierErrorKind
impl<T> From<T> for AtelierError
where
    T: Into<AtelierErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Atelier operations.
pub type AtelierResult<T> = std::result::Result<T, AtelierError>;
