//! Configuration sections that have no home in `atelier_core`.

use atelier_core::{EmptyOutputPolicy, Endpoint, PromptSettings, StageSettings};
use atelier_error::{AtelierResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prompt blocklist section.
///
/// ```toml
/// [blocklist]
/// enabled = true
/// rules = """
/// word:cat
/// substr:gore
/// /nsfw\\d+/i
/// """
/// rules_file = "/etc/atelier/blocklist.txt"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlocklistConfig {
    /// Whether matching prompts are rejected
    #[serde(default)]
    pub enabled: bool,
    /// Inline rule text, one rule per line
    #[serde(default)]
    pub rules: String,
    /// Extra rule file appended after the inline rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,
}

impl BlocklistConfig {
    /// Full rule text: inline rules followed by the rule file, if any.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the rule file cannot be read.
    pub fn rule_text(&self) -> AtelierResult<String> {
        let Some(path) = &self.rules_file else {
            return Ok(self.rules.clone());
        };
        let file_rules = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read blocklist rules from {}: {}",
                path.display(),
                e
            ))
        })?;
        if self.rules.trim().is_empty() {
            Ok(file_rules)
        } else {
            Ok(format!("{}\n{}", self.rules, file_rules))
        }
    }
}

/// Prompt processor section: stage settings plus the chat endpoint the stages call.
///
/// ```toml
/// [prompt]
/// base_url = "https://api.openai.com"
/// api_key = "sk-..."
/// empty_output = "pass_through"
///
/// [prompt.filter]
/// enabled = true
/// model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Policy rewrite stage
    #[serde(default)]
    pub filter: StageSettings,
    /// Translation stage
    #[serde(default)]
    pub translate: StageSettings,
    /// Behaviour on empty model output
    #[serde(default)]
    pub empty_output: EmptyOutputPolicy,
    /// Chat-completion base URL used by both stages
    #[serde(default)]
    pub base_url: String,
    /// Bearer token for the chat-completion endpoint
    #[serde(default)]
    pub api_key: String,
}

impl PromptConfig {
    /// Stage settings for the prompt processor.
    pub fn settings(&self) -> PromptSettings {
        PromptSettings {
            filter: self.filter.clone(),
            translate: self.translate.clone(),
            empty_output: self.empty_output,
        }
    }

    /// Endpoint the stages call.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.base_url.clone(), self.api_key.clone())
    }
}
