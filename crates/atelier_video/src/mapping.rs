//! Per-provider upstream model naming.

use atelier_core::{DurationBucket, Orientation, VideoModel};

/// Generation mode of a Flow (Veo) model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FlowMode {
    /// Text to video
    T2v,
    /// First-frame image to video
    I2v,
    /// Reference images to video
    R2v,
}

impl FlowMode {
    /// Mode named by a logical model: `r2v` beats `i2v`, anything else is text to video.
    pub fn from_model_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("r2v") {
            FlowMode::R2v
        } else if name.contains("i2v") {
            FlowMode::I2v
        } else {
            FlowMode::T2v
        }
    }

    /// Mode for `model` given how many images the request attaches.
    ///
    /// A `mode` key in the model's channel config wins. With images attached, the
    /// advertised features decide: reference-to-video for several images or when it
    /// is the only image mode, otherwise image-to-video. The model name decides the rest.
    pub fn for_model(model: &VideoModel, images: usize) -> Self {
        if let Some(mode) = model.config_str("mode").and_then(|m| m.parse().ok()) {
            return mode;
        }
        let features = &model.features;
        if images > 0 {
            if features.reference_to_video && (images > 1 || !features.image_to_video) {
                return FlowMode::R2v;
            }
            if features.image_to_video {
                return FlowMode::I2v;
            }
        }
        Self::from_model_name(&model.api_model)
    }
}

/// A concrete upstream identifier and the duration tier it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamModel {
    /// Identifier sent upstream
    pub id: String,
    /// Tier the upstream actually renders
    pub duration: DurationBucket,
}

/// Map a logical Flow model to a concrete Veo identifier.
///
/// `orientation` accepts an aspect ratio or an orientation word; square and unknown
/// values fall back to landscape. A `15s` duration selects the 15-second variants,
/// every other duration the default ones. Identifiers already starting with `veo_`
/// pass through unchanged.
///
/// # Examples
///
/// ```
/// use atelier_video::map_flow_model;
///
/// assert_eq!(
///     map_flow_model("i2v-model", "portrait", "15s"),
///     "veo_2_1_fast_d_15_i2v_portrait"
/// );
/// assert_eq!(map_flow_model("veo", "16:9", "10s"), "veo_3_1_t2v_fast_landscape");
/// assert_eq!(map_flow_model("r2v", "9:16", "15s"), "veo_3_1_r2v_fast_portrait");
/// assert_eq!(
///     map_flow_model("veo_3_1_i2v_s_fast_fl_landscape", "9:16", "15s"),
///     "veo_3_1_i2v_s_fast_fl_landscape"
/// );
/// ```
pub fn map_flow_model(logical: &str, orientation: &str, duration: &str) -> String {
    map_flow(FlowMode::from_model_name(logical), logical, orientation, duration).id
}

/// Map a Flow model in an explicit `mode`, reporting the tier it renders.
///
/// Only the `d_15` variants render fifteen seconds; every other identifier renders
/// the ten second tier.
pub fn map_flow(
    mode: FlowMode,
    logical: &str,
    orientation: &str,
    duration: &str,
) -> UpstreamModel {
    let logical = logical.trim();
    if logical.to_ascii_lowercase().starts_with("veo_") {
        return UpstreamModel {
            id: logical.to_string(),
            duration: flow_duration(logical),
        };
    }

    let o = Orientation::from_aspect_ratio_or_default(orientation).without_square();
    let fifteen = DurationBucket::parse(duration) == Some(DurationBucket::Fifteen);

    let id = match (mode, fifteen) {
        (FlowMode::R2v, _) => format!("veo_3_1_r2v_fast_{}", o),
        (FlowMode::I2v, true) => format!("veo_2_1_fast_d_15_i2v_{}", o),
        (FlowMode::I2v, false) => format!("veo_3_1_i2v_s_fast_fl_{}", o),
        (FlowMode::T2v, true) => format!("veo_2_1_fast_d_15_t2v_{}", o),
        (FlowMode::T2v, false) => format!("veo_3_1_t2v_fast_{}", o),
    };
    UpstreamModel {
        duration: flow_duration(&id),
        id,
    }
}

fn flow_duration(id: &str) -> DurationBucket {
    if id.to_ascii_lowercase().contains("_d_15_") {
        DurationBucket::Fifteen
    } else {
        DurationBucket::Ten
    }
}

/// Map a Grok base model to `{base}-{orientation}-{10s|15s}`.
///
/// The `15s` and `25s` tiers select `15s`, anything else `10s`. Square and
/// unknown orientations fall back to landscape. Identifiers that already carry an
/// orientation and duration suffix pass through unchanged.
///
/// # Examples
///
/// ```
/// use atelier_video::map_grok_model;
///
/// assert_eq!(
///     map_grok_model("grok-imagine-1.0-video", "landscape", "10s"),
///     "grok-imagine-1.0-video-landscape-10s"
/// );
/// assert_eq!(
///     map_grok_model("grok-imagine-1.0-video", "9:16", "15s"),
///     "grok-imagine-1.0-video-portrait-15s"
/// );
/// assert_eq!(
///     map_grok_model("grok-imagine-1.0-video-portrait-15s", "16:9", "10s"),
///     "grok-imagine-1.0-video-portrait-15s"
/// );
/// ```
pub fn map_grok_model(base: &str, orientation: &str, duration: &str) -> String {
    map_grok(base, orientation, duration).id
}

/// Map a Grok base model, reporting the tier it renders.
pub fn map_grok(base: &str, orientation: &str, duration: &str) -> UpstreamModel {
    let base = base.trim();
    if let Some(rendered) = grok_suffix_duration(base) {
        return UpstreamModel {
            id: base.to_string(),
            duration: rendered,
        };
    }

    let o = Orientation::from_aspect_ratio_or_default(orientation).without_square();
    let rendered = match DurationBucket::from_label(duration) {
        DurationBucket::Ten => DurationBucket::Ten,
        DurationBucket::Fifteen | DurationBucket::TwentyFive => DurationBucket::Fifteen,
    };
    UpstreamModel {
        id: format!("{}-{}-{}", base, o, rendered),
        duration: rendered,
    }
}

/// Duration of an identifier that already ends in `-{orientation}-{10s|15s}`.
fn grok_suffix_duration(model: &str) -> Option<DurationBucket> {
    let lowered = model.to_ascii_lowercase();
    let (rest, duration) = lowered.rsplit_once('-')?;
    let (_, orientation) = rest.rsplit_once('-')?;
    if !matches!(orientation, "landscape" | "portrait" | "square") {
        return None;
    }
    match duration {
        "10s" => Some(DurationBucket::Ten),
        "15s" => Some(DurationBucket::Fifteen),
        _ => None,
    }
}
