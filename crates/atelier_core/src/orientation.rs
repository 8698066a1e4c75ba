//! Frame orientation derived from aspect ratios.

use serde::{Deserialize, Serialize};

/// Frame orientation of a generated video.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Orientation {
    /// Wider than tall
    #[default]
    Landscape,
    /// Taller than wide
    Portrait,
    /// Equal sides
    Square,
}

impl Orientation {
    /// Parse an aspect ratio (`16:9`, `9:16`, `1:1`, any `W:H`) or an orientation word.
    ///
    /// Returns `None` for anything unrecognised.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_core::Orientation;
    ///
    /// assert_eq!(Orientation::from_aspect_ratio("16:9"), Some(Orientation::Landscape));
    /// assert_eq!(Orientation::from_aspect_ratio("9:16"), Some(Orientation::Portrait));
    /// assert_eq!(Orientation::from_aspect_ratio("4:3"), Some(Orientation::Landscape));
    /// assert_eq!(Orientation::from_aspect_ratio("Portrait"), Some(Orientation::Portrait));
    /// assert_eq!(Orientation::from_aspect_ratio("1:1"), Some(Orientation::Square));
    /// assert_eq!(Orientation::from_aspect_ratio("wide"), None);
    /// ```
    pub fn from_aspect_ratio(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "landscape" | "horizontal" => return Some(Orientation::Landscape),
            "portrait" | "vertical" => return Some(Orientation::Portrait),
            "square" => return Some(Orientation::Square),
            _ => {}
        }

        let (w, h) = value.split_once([':', 'x', '/'])?;
        let w: f64 = w.trim().parse().ok()?;
        let h: f64 = h.trim().parse().ok()?;
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        Some(if (w - h).abs() < f64::EPSILON {
            Orientation::Square
        } else if w > h {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        })
    }

    /// Same as [`Orientation::from_aspect_ratio`], defaulting to landscape.
    pub fn from_aspect_ratio_or_default(value: &str) -> Self {
        Self::from_aspect_ratio(value).unwrap_or_default()
    }

    /// Collapse square onto landscape for providers that only know two orientations.
    pub fn without_square(self) -> Self {
        match self {
            Orientation::Square => Orientation::Landscape,
            other => other,
        }
    }
}
