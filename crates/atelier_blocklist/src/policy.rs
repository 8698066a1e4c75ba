//! Enforcing a blocklist on prompts.

use crate::{Blocklist, find_blocked_words};
use atelier_core::LogContext;
use atelier_error::{AtelierResult, BlockedPromptError};
use std::sync::Arc;
use tracing::{debug, warn};

/// A blocklist plus the switch that decides whether matches reject the prompt.
#[derive(Debug, Clone)]
pub struct BlocklistPolicy {
    enabled: bool,
    blocklist: Arc<Blocklist>,
    log: LogContext,
}

impl BlocklistPolicy {
    /// Create a policy.
    pub fn new(enabled: bool, blocklist: Arc<Blocklist>, log: LogContext) -> Self {
        Self {
            enabled,
            blocklist,
            log: log.child("blocklist"),
        }
    }

    /// A policy that lets everything through.
    pub fn disabled() -> Self {
        Self::new(false, Arc::new(Blocklist::default()), LogContext::disabled())
    }

    /// Whether matches reject the prompt.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The underlying blocklist.
    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// Matched rule lines, regardless of whether blocking is enabled.
    pub fn matches(&self, prompt: &str) -> Vec<String> {
        find_blocked_words(prompt, &self.blocklist)
    }

    /// Reject the prompt if blocking is enabled and any rule matches.
    ///
    /// # Errors
    ///
    /// Returns a [`BlockedPromptError`] listing every matched rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_blocklist::{Blocklist, BlocklistPolicy};
    /// use atelier_core::LogContext;
    /// use std::sync::Arc;
    ///
    /// let rules = Arc::new(Blocklist::parse("word:cat"));
    ///
    /// let on = BlocklistPolicy::new(true, rules.clone(), LogContext::disabled());
    /// let err = on.check("the cat sat").unwrap_err();
    /// assert!(err.to_string().contains("word:cat"));
    ///
    /// let off = BlocklistPolicy::new(false, rules, LogContext::disabled());
    /// assert!(off.check("the cat sat").is_ok());
    /// ```
    pub fn check(&self, prompt: &str) -> AtelierResult<()> {
        self.log.scope(|| {
            if !self.enabled {
                debug!("Blocklist disabled, skipping check");
                return Ok(());
            }
            let matched = self.matches(prompt);
            if matched.is_empty() {
                debug!(rules = self.blocklist.len(), "Prompt passed blocklist");
                return Ok(());
            }
            warn!(matched = ?matched, "Prompt rejected by blocklist");
            Err(BlockedPromptError::new(matched).into())
        })
    }
}
