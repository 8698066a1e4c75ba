//! Prompt processing settings.

use atelier_error::{AtelierResult, ConfigError};
use serde::{Deserialize, Serialize};

/// A rewrite stage of the prompt processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PromptStage {
    /// Policy rewrite of the prompt
    Filter,
    /// Translation into the upstream's preferred language
    Translate,
}

/// What to do when a rewrite model answers with nothing usable.
///
/// Two deployed variants of the processor disagree here, so neither behaviour is
/// assumed: the operator picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyOutputPolicy {
    /// Abort the generation with an extraction error
    #[default]
    Fail,
    /// Keep the stage's input unchanged
    PassThrough,
}

/// Toggle, model and instruction for one rewrite stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageSettings {
    /// Whether the stage runs
    #[serde(default)]
    pub enabled: bool,
    /// Chat-completion model used for the stage
    #[serde(default)]
    pub model: String,
    /// System instruction; blank means the built-in default
    #[serde(default)]
    pub instruction: String,
}

impl StageSettings {
    fn has_model(&self) -> bool {
        !self.model.trim().is_empty()
    }
}

/// Settings of the prompt processor.
///
/// ```toml
/// [prompt]
/// empty_output = "fail"
///
/// [prompt.filter]
/// enabled = true
/// model = "gpt-4o-mini"
///
/// [prompt.translate]
/// enabled = true
/// model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromptSettings {
    /// Policy rewrite stage
    #[serde(default)]
    pub filter: StageSettings,
    /// Translation stage
    #[serde(default)]
    pub translate: StageSettings,
    /// Behaviour on empty model output
    #[serde(default)]
    pub empty_output: EmptyOutputPolicy,
}

impl PromptSettings {
    /// Check the stage settings are coherent.
    ///
    /// Translated text is always re-filtered, so translation needs both models.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_core::{PromptSettings, StageSettings};
    ///
    /// let mut settings = PromptSettings::default();
    /// settings.translate = StageSettings {
    ///     enabled: true,
    ///     model: "gpt-4o-mini".to_string(),
    ///     instruction: String::new(),
    /// };
    /// assert!(settings.validate().is_err());
    ///
    /// settings.filter.model = "gpt-4o-mini".to_string();
    /// assert!(settings.validate().is_ok());
    /// ```
    #[track_caller]
    pub fn validate(&self) -> AtelierResult<()> {
        if self.filter.enabled && !self.filter.has_model() {
            return Err(
                ConfigError::new("prompt filter is enabled but no filter model is set").into(),
            );
        }
        if self.translate.enabled {
            if !self.translate.has_model() {
                return Err(ConfigError::new(
                    "prompt translation is enabled but no translate model is set",
                )
                .into());
            }
            if !self.filter.has_model() {
                return Err(ConfigError::new(
                    "prompt translation requires a filter model to re-filter translated text",
                )
                .into());
            }
        }
        Ok(())
    }

    /// True when at least one stage will call a model.
    pub fn any_enabled(&self) -> bool {
        self.filter.enabled || self.translate.enabled
    }
}
