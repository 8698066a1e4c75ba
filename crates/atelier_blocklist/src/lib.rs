//! Prompt blocklist for the Atelier generation gateway.
//!
//! A blocklist is plain text with one rule per line:
//!
//! | Line | Matches |
//! |---|---|
//! | `word:cat` or `cat` | `cat` as a whole word, case-insensitive, Unicode-aware |
//! | `substr:cat` | any occurrence of `cat`, case-insensitive |
//! | `re:c[ao]t` / `regex:c[ao]t` | the regular expression, case-insensitive |
//! | `/c[ao]t/i` | the regular expression with the given flags |
//!
//! Blank lines are ignored, duplicate lines collapse onto their first occurrence, and
//! lines whose regular expression does not compile are dropped.
//!
//! # Example
//!
//! ```
//! use atelier_blocklist::{Blocklist, find_blocked_words};
//!
//! let blocklist = Blocklist::parse("word:cat\nsubstr:gore\n/blood\\s*bath/i");
//! let matched = find_blocked_words("The CAT watched a Blood Bath", &blocklist);
//! assert_eq!(matched, vec!["word:cat", "/blood\\s*bath/i"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod matcher;
mod policy;
mod rule;

pub use cache::BlocklistCache;
pub use matcher::{Blocklist, find_blocked_words, find_blocked_words_in};
pub use policy::BlocklistPolicy;
pub use rule::{BlocklistRule, RuleKind};
