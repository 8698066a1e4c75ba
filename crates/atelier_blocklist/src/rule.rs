//! Single blocklist rules.

use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Which matcher a rule compiled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Whole-word match
    Word,
    /// Substring containment
    Substring,
    /// Regular expression test
    Regex,
}

#[derive(Debug, Clone)]
enum Matcher {
    Word(Regex),
    Substring(String),
    Regex(Regex),
}

/// One compiled line of blocklist text.
#[derive(Debug, Clone)]
pub struct BlocklistRule {
    raw: String,
    matcher: Matcher,
}

/// Characters that count as part of a word for whole-word matching.
const WORD_CHARS: &str = r"\p{L}\p{N}\p{M}_";

impl BlocklistRule {
    /// Compile one line. Returns `None` for blank lines, empty rule bodies, and
    /// regular expressions that do not compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_blocklist::{BlocklistRule, RuleKind};
    ///
    /// assert_eq!(BlocklistRule::parse("word:cat").unwrap().kind(), RuleKind::Word);
    /// assert_eq!(BlocklistRule::parse("cat").unwrap().kind(), RuleKind::Word);
    /// assert_eq!(BlocklistRule::parse("SUBSTR:cat").unwrap().kind(), RuleKind::Substring);
    /// assert_eq!(BlocklistRule::parse("/c.t/i").unwrap().kind(), RuleKind::Regex);
    /// assert!(BlocklistRule::parse("re:(unbalanced").is_none());
    /// assert!(BlocklistRule::parse("   ").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let raw = line.trim();
        if raw.is_empty() {
            return None;
        }

        let matcher = if let Some(body) = strip_prefix_ci(raw, "word:") {
            word_matcher(body)?
        } else if let Some(body) = strip_prefix_ci(raw, "substr:") {
            substring_matcher(body)?
        } else if let Some(body) =
            strip_prefix_ci(raw, "regex:").or_else(|| strip_prefix_ci(raw, "re:"))
        {
            regex_matcher(body, "i", raw)?
        } else if let Some((pattern, flags)) = split_regex_literal(raw) {
            regex_matcher(pattern, flags, raw)?
        } else {
            word_matcher(raw)?
        };

        Some(Self {
            raw: raw.to_string(),
            matcher,
        })
    }

    /// The source line, trimmed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Key under which duplicate lines collapse.
    pub fn normalized(&self) -> String {
        normalize(&self.raw)
    }

    /// Which matcher the line compiled to.
    pub fn kind(&self) -> RuleKind {
        match self.matcher {
            Matcher::Word(_) => RuleKind::Word,
            Matcher::Substring(_) => RuleKind::Substring,
            Matcher::Regex(_) => RuleKind::Regex,
        }
    }

    /// Test a prompt against this rule.
    ///
    /// `lowered` is the prompt already lowercased, shared across substring rules.
    pub(crate) fn is_match(&self, prompt: &str, lowered: &str) -> bool {
        match &self.matcher {
            Matcher::Word(re) | Matcher::Regex(re) => re.is_match(prompt),
            Matcher::Substring(needle) => lowered.contains(needle.as_str()),
        }
    }

    /// Test a prompt against this rule.
    pub fn matches(&self, prompt: &str) -> bool {
        self.is_match(prompt, &prompt.to_lowercase())
    }
}

pub(crate) fn normalize(line: &str) -> String {
    line.trim().to_lowercase()
}

fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| line[prefix.len()..].trim())
}

fn word_matcher(word: &str) -> Option<Matcher> {
    if word.is_empty() {
        return None;
    }
    let pattern = format!(
        r"(?:^|[^{chars}]){word}(?:$|[^{chars}])",
        chars = WORD_CHARS,
        word = regex::escape(word)
    );
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => Some(Matcher::Word(re)),
        Err(e) => {
            debug!(word, error = %e, "Dropping word rule that failed to compile");
            None
        }
    }
}

fn substring_matcher(needle: &str) -> Option<Matcher> {
    if needle.is_empty() {
        return None;
    }
    Some(Matcher::Substring(needle.to_lowercase()))
}

/// Split `/pattern/flags` into its parts.
fn split_regex_literal(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (pattern, flags) = (&rest[..close], &rest[close + 1..]);
    if pattern.is_empty() || !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some((pattern, flags))
}

fn regex_matcher(pattern: &str, flags: &str, raw: &str) -> Option<Matcher> {
    if pattern.is_empty() {
        return None;
    }
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            // Global, sticky, unicode and indices change nothing for a single test.
            'g' | 'y' | 'u' | 'd' => {}
            other => {
                debug!(rule = raw, flag = %other, "Dropping regex rule with unknown flag");
                return None;
            }
        }
    }
    match builder.build() {
        Ok(re) => Some(Matcher::Regex(re)),
        Err(e) => {
            debug!(rule = raw, error = %e, "Dropping regex rule that failed to compile");
            None
        }
    }
}
