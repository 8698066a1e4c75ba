//! Connection details for an upstream API.

use atelier_error::{AtelierResult, ConfigError};
use serde::{Deserialize, Serialize};

/// Base URL plus bearer token of an upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Endpoint {
    /// Base URL, with or without a trailing `/v1`
    #[serde(default)]
    pub base_url: String,
    /// Bearer token
    #[serde(default)]
    pub api_key: String,
}

impl Endpoint {
    /// Create an endpoint.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fail with a configuration error unless both base URL and API key are set.
    ///
    /// `owner` names the configuration section or channel in the message.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_core::Endpoint;
    ///
    /// assert!(Endpoint::new("https://api.example.com", "sk-1").require("prompt").is_ok());
    /// assert!(Endpoint::new("", "sk-1").require("prompt").is_err());
    /// assert!(Endpoint::new("https://api.example.com", " ").require("prompt").is_err());
    /// ```
    #[track_caller]
    pub fn require(&self, owner: &str) -> AtelierResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::new(format!("{}: base URL is not configured", owner)).into());
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::new(format!("{}: API key is not configured", owner)).into());
        }
        Ok(())
    }

    /// Base URL without trailing slashes.
    pub fn trimmed_base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}
