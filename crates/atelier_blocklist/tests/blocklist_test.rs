//! Blocklist behavior across parsing, matching, caching and enforcement.

use atelier_blocklist::{
    Blocklist, BlocklistCache, BlocklistPolicy, find_blocked_words, find_blocked_words_in,
};
use atelier_core::LogContext;
use atelier_error::AtelierErrorKind;
use std::sync::Arc;

#[test]
fn test_word_and_substring_on_same_term() {
    let rules = "word:cat\nsubstr:cat";
    assert_eq!(
        find_blocked_words_in("I have a cat", rules),
        vec!["word:cat", "substr:cat"]
    );
    assert_eq!(find_blocked_words_in("concatenate", rules), vec!["substr:cat"]);
}

#[test]
fn test_matching_is_idempotent() {
    let blocklist = Blocklist::parse("word:cat\n/d.g/i\nsubstr:bird\nre:fish+");
    let prompt = "A Cat, a DOG, a blackbird and a fishhh";
    let first = find_blocked_words(prompt, &blocklist);
    let second = find_blocked_words(prompt, &blocklist);
    assert_eq!(first, second);
    assert_eq!(first, vec!["word:cat", "/d.g/i", "substr:bird", "re:fish+"]);
}

#[test]
fn test_invalid_regex_is_ignored_not_fatal() {
    let matched = find_blocked_words_in("cat (", "re:(\nword:cat\n/[/");
    assert_eq!(matched, vec!["word:cat"]);
}

#[test]
fn test_duplicate_rules_reported_once() {
    let matched = find_blocked_words_in("cat", "word:cat\nWORD:CAT\n  word:cat");
    assert_eq!(matched, vec!["word:cat"]);
}

#[test]
fn test_no_rules_no_matches() {
    assert!(find_blocked_words_in("anything at all", "").is_empty());
}

#[test]
fn test_cache_shares_compiled_blocklist() {
    let cache = BlocklistCache::default();
    let a = cache.get_or_compile("word:cat");
    let b = cache.get_or_compile("word:cat");
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);
    assert_eq!(
        BlocklistCache::version("word:cat"),
        BlocklistCache::version("word:cat")
    );
    assert_ne!(
        BlocklistCache::version("word:cat"),
        BlocklistCache::version("word:dog")
    );
}

#[test]
fn test_policy_rejects_with_every_match() -> anyhow::Result<()> {
    let policy = BlocklistPolicy::new(
        true,
        Arc::new(Blocklist::parse("word:cat\nsubstr:dog")),
        LogContext::disabled(),
    );

    policy.check("a bird")?;

    let err = policy.check("cat and hotdog").unwrap_err();
    assert!(err.is_blocked_prompt());
    match err.kind() {
        AtelierErrorKind::BlockedPrompt(blocked) => {
            assert_eq!(blocked.matched, vec!["word:cat", "substr:dog"]);
        }
        other => panic!("unexpected error kind: {other}"),
    }
    Ok(())
}

#[test]
fn test_disabled_policy_still_reports_matches() {
    let policy = BlocklistPolicy::new(
        false,
        Arc::new(Blocklist::parse("word:cat")),
        LogContext::disabled(),
    );
    assert!(policy.check("cat").is_ok());
    assert_eq!(policy.matches("cat"), vec!["word:cat"]);
    assert!(BlocklistPolicy::disabled().check("cat").is_ok());
}
