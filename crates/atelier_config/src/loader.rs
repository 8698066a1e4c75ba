//! Top-level configuration and loading.

use crate::{BlocklistConfig, PromptConfig};
use atelier_core::{HttpSettings, PricingTable, SoraSettings, VideoChannel, VideoModel};
use atelier_error::{AtelierError, AtelierResult, ConfigError};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../atelier.toml");

/// Top-level Atelier configuration.
///
/// # Example
///
/// ```no_run
/// use atelier_config::AtelierConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Load configuration (bundled defaults + user overrides + environment)
/// let config = AtelierConfig::load()?;
/// config.validate()?;
///
/// println!("blocklist enabled: {}", config.blocklist.enabled);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AtelierConfig {
    /// Prompt blocklist
    #[serde(default)]
    pub blocklist: BlocklistConfig,
    /// Prompt processor
    #[serde(default)]
    pub prompt: PromptConfig,
    /// Outbound HTTP behaviour
    #[serde(default)]
    pub http: HttpSettings,
    /// Native Sora backend
    #[serde(default)]
    pub sora: SoraSettings,
    /// Credit prices per duration tier
    #[serde(default)]
    pub pricing: PricingTable,
    /// Provider channels
    #[serde(default)]
    pub channels: Vec<VideoChannel>,
    /// Models offered by the channels
    #[serde(default)]
    pub models: Vec<VideoModel>,
}

impl AtelierConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> AtelierResult<Self> {
        debug!("Loading configuration from file");

        Self::finish(Config::builder().add_source(File::from(path.as_ref())))
    }

    /// Parse configuration from TOML text, on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml_str(text: &str) -> AtelierResult<Self> {
        Self::finish(Self::defaults().add_source(File::from_str(text, FileFormat::Toml)))
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> AtelierResult<Self> {
        debug!(
            "Loading configuration with precedence: env > current dir > home dir > bundled defaults"
        );

        Self::load_with_env(Self::environment())
    }

    fn load_with_env(env: Environment) -> AtelierResult<Self> {
        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/atelier/atelier.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("atelier").required(false))
            .add_source(env);

        Self::finish(builder)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn environment() -> Environment {
        Environment::with_prefix("ATELIER")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> AtelierResult<Self> {
        builder
            .build()
            .map_err(|e| {
                AtelierError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AtelierError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Check cross-references and prompt settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for duplicate channel or model ids, models that
    /// reference an unknown channel, or incoherent prompt settings.
    #[instrument(skip(self), fields(channels = self.channels.len(), models = self.models.len()))]
    pub fn validate(&self) -> AtelierResult<()> {
        let mut channel_ids = HashSet::new();
        for channel in &self.channels {
            if !channel_ids.insert(channel.id.as_str()) {
                return Err(
                    ConfigError::new(format!("duplicate channel id '{}'", channel.id)).into(),
                );
            }
        }

        let mut model_ids = HashSet::new();
        for model in &self.models {
            if !model_ids.insert(model.id.as_str()) {
                return Err(ConfigError::new(format!("duplicate model id '{}'", model.id)).into());
            }
            if !channel_ids.contains(model.channel_id.as_str()) {
                return Err(ConfigError::new(format!(
                    "model '{}' references unknown channel '{}'",
                    model.id, model.channel_id
                ))
                .into());
            }
        }

        self.prompt.settings().validate()?;
        debug!("Configuration is valid");
        Ok(())
    }
}
