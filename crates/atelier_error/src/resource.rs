//! Errors about admin-managed resources (channels and models).

/// Which kind of admin-managed resource an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ResourceKind {
    /// A provider channel
    #[display("channel")]
    Channel,
    /// A model offered by a channel
    #[display("model")]
    Model,
}

/// The referenced channel or model exists but is switched off.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Disabled Error: {} '{}' is disabled at line {} in {}", resource, id, line, file)]
pub struct DisabledError {
    /// Resource kind
    pub resource: ResourceKind,
    /// Resource identifier
    pub id: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl DisabledError {
    /// Create a new DisabledError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_error::{DisabledError, ResourceKind};
    ///
    /// let err = DisabledError::new(ResourceKind::Channel, "flow-main");
    /// assert!(err.to_string().contains("channel 'flow-main' is disabled"));
    /// ```
    #[track_caller]
    pub fn new(resource: ResourceKind, id: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            resource,
            id: id.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

/// The referenced channel or model does not exist.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Not Found Error: {} '{}' not found at line {} in {}", resource, id, line, file)]
pub struct NotFoundError {
    /// Resource kind
    pub resource: ResourceKind,
    /// Resource identifier
    pub id: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError at the current location.
    #[track_caller]
    pub fn new(resource: ResourceKind, id: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            resource,
            id: id.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
