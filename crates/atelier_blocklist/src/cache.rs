//! Compiled blocklists keyed by rule-text version.

use crate::Blocklist;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Number of distinct rule-text versions kept before the cache is reset.
const DEFAULT_CAPACITY: usize = 8;

/// Memoises [`Blocklist::parse`] by a SHA-256 digest of the rule text, so the regular
/// expressions of one configuration version compile once.
#[derive(Debug)]
pub struct BlocklistCache {
    entries: Mutex<HashMap<[u8; 32], Arc<Blocklist>>>,
    capacity: usize,
}

impl Default for BlocklistCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl BlocklistCache {
    /// Create a cache holding up to `capacity` versions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Version key of a rule text.
    pub fn version(text: &str) -> [u8; 32] {
        Sha256::digest(text.as_bytes()).into()
    }

    /// The compiled blocklist for `text`, compiling it on first use.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_blocklist::BlocklistCache;
    /// use std::sync::Arc;
    ///
    /// let cache = BlocklistCache::default();
    /// let a = cache.get_or_compile("word:cat");
    /// let b = cache.get_or_compile("word:cat");
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn get_or_compile(&self, text: &str) -> Arc<Blocklist> {
        let version = Self::version(text);
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(hit) = entries.get(&version) {
            return Arc::clone(hit);
        }

        if entries.len() >= self.capacity {
            debug!(capacity = self.capacity, "Blocklist cache full, resetting");
            entries.clear();
        }

        let compiled = Arc::new(Blocklist::parse(text));
        entries.insert(version, Arc::clone(&compiled));
        compiled
    }

    /// Number of cached versions.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
