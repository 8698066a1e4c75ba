//! Credit pricing by duration tier.

use serde::{Deserialize, Serialize};

/// Duration tier used for pricing and for native Sora jobs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
)]
pub enum DurationBucket {
    /// Ten seconds (the fallback tier)
    #[default]
    #[strum(serialize = "10s")]
    #[serde(rename = "10s")]
    Ten,
    /// Fifteen seconds
    #[strum(serialize = "15s")]
    #[serde(rename = "15s")]
    Fifteen,
    /// Twenty-five seconds
    #[strum(serialize = "25s")]
    #[serde(rename = "25s")]
    TwentyFive,
}

impl DurationBucket {
    /// Parse an exact duration label (`10s`, `15`, `25s`, ...).
    ///
    /// Labels outside the three tiers (including zero-padded ones like `07s`) are `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "10s" | "10" => Some(DurationBucket::Ten),
            "15s" | "15" => Some(DurationBucket::Fifteen),
            "25s" | "25" => Some(DurationBucket::TwentyFive),
            _ => None,
        }
    }

    /// Parse a duration label, falling back to the lowest tier.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_core::DurationBucket;
    ///
    /// assert_eq!(DurationBucket::from_label("25s"), DurationBucket::TwentyFive);
    /// assert_eq!(DurationBucket::from_label("07s"), DurationBucket::Ten);
    /// assert_eq!(DurationBucket::from_label("forever"), DurationBucket::Ten);
    /// ```
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }

    /// Length in seconds.
    pub fn seconds(self) -> u32 {
        match self {
            DurationBucket::Ten => 10,
            DurationBucket::Fifteen => 15,
            DurationBucket::TwentyFive => 25,
        }
    }
}

/// Configured credit price per duration tier.
///
/// ```toml
/// [pricing]
/// video_10s = 100
/// video_15s = 150
/// video_25s = 250
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricingTable {
    /// Credits for a 10 second video
    #[serde(default = "default_10s")]
    pub video_10s: u32,
    /// Credits for a 15 second video
    #[serde(default = "default_15s")]
    pub video_15s: u32,
    /// Credits for a 25 second video
    #[serde(default = "default_25s")]
    pub video_25s: u32,
}

fn default_10s() -> u32 {
    100
}

fn default_15s() -> u32 {
    150
}

fn default_25s() -> u32 {
    250
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            video_10s: default_10s(),
            video_15s: default_15s(),
            video_25s: default_25s(),
        }
    }
}

impl PricingTable {
    /// Price of a tier.
    pub fn price(&self, bucket: DurationBucket) -> u32 {
        match bucket {
            DurationBucket::Ten => self.video_10s,
            DurationBucket::Fifteen => self.video_15s,
            DurationBucket::TwentyFive => self.video_25s,
        }
    }

    /// Price of a duration label; unrecognised labels cost the 10s tier.
    pub fn cost_for(&self, duration: &str) -> u32 {
        self.price(DurationBucket::from_label(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PricingTable {
        PricingTable {
            video_10s: 10,
            video_15s: 15,
            video_25s: 25,
        }
    }

    #[test]
    fn test_known_tiers() {
        let pricing = table();
        assert_eq!(pricing.cost_for("10s"), 10);
        assert_eq!(pricing.cost_for("15s"), 15);
        assert_eq!(pricing.cost_for("25s"), 25);
        assert_eq!(pricing.cost_for(" 25S "), 25);
    }

    #[test]
    fn test_unrecognised_durations_use_lowest_tier() {
        let pricing = table();
        assert_eq!(pricing.cost_for("07s"), 10);
        assert_eq!(pricing.cost_for("20s"), 10);
        assert_eq!(pricing.cost_for(""), 10);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let pricing: PricingTable = serde_json::from_str(r#"{"video_15s": 1}"#).unwrap();
        assert_eq!(pricing.video_10s, 100);
        assert_eq!(pricing.video_15s, 1);
        assert_eq!(pricing.video_25s, 250);
    }
}
