//! Models offered by a channel.

use crate::VideoChannel;
use serde::{Deserialize, Serialize};

/// Capabilities a model advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelFeatures {
    /// Accepts a prompt alone
    #[serde(default = "default_true")]
    pub text_to_video: bool,
    /// Accepts a starting frame image
    #[serde(default)]
    pub image_to_video: bool,
    /// Accepts reference images
    #[serde(default)]
    pub reference_to_video: bool,
}

impl Default for ModelFeatures {
    fn default() -> Self {
        Self {
            text_to_video: true,
            image_to_video: false,
            reference_to_video: false,
        }
    }
}

/// One selectable aspect ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatioOption {
    /// Value sent with the request (`16:9`, `portrait`, ...)
    pub value: String,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
    /// Whether users may pick it
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// One selectable duration and its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationOption {
    /// Value sent with the request (`10s`, `15s`, ...)
    pub value: String,
    /// Credit cost overriding the pricing table
    #[serde(default)]
    pub cost: Option<u32>,
    /// Whether users may pick it
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// A named video offering within exactly one channel.
///
/// ```toml
/// [[models]]
/// id = "veo-i2v"
/// channel_id = "flow-main"
/// name = "Veo image to video"
/// api_model = "i2v-model"
/// features = { image_to_video = true }
/// aspect_ratios = [{ value = "16:9" }, { value = "9:16" }]
/// durations = [{ value = "10s", cost = 80 }, { value = "15s", cost = 120 }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoModel {
    /// Stable identifier users select
    pub id: String,
    /// Owning channel
    pub channel_id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Logical model name the channel's naming rules start from
    pub api_model: String,
    /// Whether the model accepts new generations
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Advertised capabilities
    #[serde(default)]
    pub features: ModelFeatures,
    /// Selectable aspect ratios
    #[serde(default)]
    pub aspect_ratios: Vec<AspectRatioOption>,
    /// Selectable durations with optional per-option cost
    #[serde(default)]
    pub durations: Vec<DurationOption>,
    /// Aspect ratio used when a request names none
    #[serde(default)]
    pub default_aspect_ratio: Option<String>,
    /// Duration used when a request names none
    #[serde(default)]
    pub default_duration: Option<String>,
    /// Channel-specific settings
    #[serde(default)]
    pub config: serde_json::Value,
}

fn default_true() -> bool {
    true
}

impl VideoModel {
    /// Aspect ratio to use: the requested one, else the model default, else the first
    /// enabled option, else `16:9`.
    pub fn effective_aspect_ratio(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_aspect_ratio.clone())
            .or_else(|| {
                self.aspect_ratios
                    .iter()
                    .find(|o| o.enabled)
                    .map(|o| o.value.clone())
            })
            .unwrap_or_else(|| "16:9".to_string())
    }

    /// Duration to use: the requested one, else the model default, else the first
    /// enabled option, else `10s`.
    pub fn effective_duration(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_duration.clone())
            .or_else(|| {
                self.durations
                    .iter()
                    .find(|o| o.enabled)
                    .map(|o| o.value.clone())
            })
            .unwrap_or_else(|| "10s".to_string())
    }

    /// Per-option cost for a duration, when the model's option table sets one.
    pub fn duration_cost(&self, duration: &str) -> Option<u32> {
        let duration = duration.trim();
        self.durations
            .iter()
            .find(|o| o.enabled && o.value.eq_ignore_ascii_case(duration))
            .and_then(|o| o.cost)
    }

    /// String value from the channel-specific config object.
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A model together with the channel it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModel {
    /// The model
    pub model: VideoModel,
    /// Its channel
    pub channel: VideoChannel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> VideoModel {
        serde_json::from_value(serde_json::json!({
            "id": "m1",
            "channel_id": "c1",
            "api_model": "grok-imagine-1.0-video",
            "aspect_ratios": [{"value": "9:16", "enabled": false}, {"value": "1:1"}],
            "durations": [{"value": "15s", "cost": 42}, {"value": "10s"}],
            "config": {"mode": " r2v "}
        }))
        .unwrap()
    }

    #[test]
    fn test_effective_values_fall_back_in_order() {
        let m = model();
        assert_eq!(m.effective_aspect_ratio(Some("16:9")), "16:9");
        assert_eq!(m.effective_aspect_ratio(Some("  ")), "1:1");
        assert_eq!(m.effective_duration(None), "15s");
    }

    #[test]
    fn test_duration_cost_only_for_priced_options() {
        let m = model();
        assert_eq!(m.duration_cost("15S"), Some(42));
        assert_eq!(m.duration_cost("10s"), None);
        assert_eq!(m.duration_cost("25s"), None);
    }

    #[test]
    fn test_config_str_trims() {
        let m = model();
        assert_eq!(m.config_str("mode"), Some("r2v"));
        assert_eq!(m.config_str("missing"), None);
    }
}
