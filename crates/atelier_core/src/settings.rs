//! Transport and native-backend settings.

use crate::Endpoint;
use serde::{Deserialize, Serialize};

/// Outbound HTTP behaviour shared by every upstream client.
///
/// ```toml
/// [http]
/// timeout_secs = 300
/// max_retries = 2
/// retry_backoff_ms = 1000
/// max_delay_secs = 30
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Whole-request timeout for standard calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after the first attempt for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Initial backoff between attempts
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Backoff ceiling
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_max_retries() -> usize {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_max_delay_secs() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl HttpSettings {
    /// Settings with retries switched off.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Native Sora backend behaviour.
///
/// ```toml
/// [sora]
/// poll_interval_secs = 5
/// max_polls = 120
///
/// [sora.link_service]
/// base_url = "https://sora-backend.example.com"
/// api_key = "token"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoraSettings {
    /// Delay between job status polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Polls before giving up on a job
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
    /// Service that turns a share permalink into an unwatermarked link; optional
    #[serde(default)]
    pub link_service: Endpoint,
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_max_polls() -> u32 {
    120
}

impl Default for SoraSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            max_polls: default_max_polls(),
            link_service: Endpoint::default(),
        }
    }
}

impl SoraSettings {
    /// The link service, when both its URL and token are configured.
    pub fn link_service(&self) -> Option<&Endpoint> {
        self.link_service.require("sora.link_service").ok()?;
        Some(&self.link_service)
    }
}
