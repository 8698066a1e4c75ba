//! Parsed blocklists and matching.

use crate::rule::{BlocklistRule, normalize};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// An ordered, de-duplicated set of compiled rules.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    rules: Vec<BlocklistRule>,
}

impl Blocklist {
    /// Parse rule text, one rule per line.
    ///
    /// Exactly one rule is kept per distinct non-blank line (compared trimmed and
    /// lowercased); lines that fail to compile are dropped.
    #[instrument(skip(text), fields(text_len = text.len()))]
    pub fn parse(text: &str) -> Self {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();
        let mut dropped = 0usize;

        for line in text.lines() {
            if line.trim().is_empty() || !seen.insert(normalize(line)) {
                continue;
            }
            match BlocklistRule::parse(line) {
                Some(rule) => rules.push(rule),
                None => dropped += 1,
            }
        }

        debug!(rules = rules.len(), dropped, "Parsed blocklist");
        Self { rules }
    }

    /// The compiled rules, in source order.
    pub fn rules(&self) -> &[BlocklistRule] {
        &self.rules
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rule compiled.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Raw lines of every rule that matches `prompt`, in rule order, without duplicates.
///
/// # Examples
///
/// ```
/// use atelier_blocklist::{Blocklist, find_blocked_words};
///
/// let blocklist = Blocklist::parse("word:cat\nsubstr:cat");
/// assert_eq!(find_blocked_words("the cat sat", &blocklist), vec!["word:cat", "substr:cat"]);
/// assert_eq!(find_blocked_words("concatenate", &blocklist), vec!["substr:cat"]);
/// assert!(find_blocked_words("a dog", &blocklist).is_empty());
/// ```
pub fn find_blocked_words(prompt: &str, blocklist: &Blocklist) -> Vec<String> {
    let lowered = prompt.to_lowercase();
    let mut seen = HashSet::new();
    blocklist
        .rules
        .iter()
        .filter(|rule| rule.is_match(prompt, &lowered))
        .filter(|rule| seen.insert(rule.normalized()))
        .map(|rule| rule.raw().to_string())
        .collect()
}

/// Parse `rules` and match `prompt` against them in one step.
///
/// Prefer [`crate::BlocklistCache`] when the same rule text is used repeatedly.
pub fn find_blocked_words_in(prompt: &str, rules: &str) -> Vec<String> {
    find_blocked_words(prompt, &Blocklist::parse(rules))
}
