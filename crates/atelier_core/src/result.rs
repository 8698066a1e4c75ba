//! Generation results.

use serde::{Deserialize, Serialize};

/// Media type of a generation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResultKind {
    /// A video
    Video,
    /// An image
    Image,
}

/// The envelope returned to the caller after a successful generation.
///
/// Serialises as `{type, url, cost, channelId, permalink?, revised_prompt?}`.
///
/// # Examples
///
/// ```
/// use atelier_core::{GenerateResult, ResultKind};
///
/// let result = GenerateResult {
///     kind: ResultKind::Video,
///     url: "https://cdn.example.com/v.mp4".to_string(),
///     cost: 100,
///     channel_id: "flow-main".to_string(),
///     permalink: None,
///     revised_prompt: None,
/// };
/// let json = serde_json::to_value(&result).unwrap();
/// assert_eq!(json["type"], "video");
/// assert_eq!(json["channelId"], "flow-main");
/// assert!(json.get("permalink").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResult {
    /// Media type
    #[serde(rename = "type")]
    pub kind: ResultKind,
    /// Where the result can be fetched
    pub url: String,
    /// Credits charged
    pub cost: u32,
    /// Channel that produced it
    #[serde(rename = "channelId")]
    pub channel_id: String,
    /// Public share page, when the upstream has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    /// Prompt as rewritten by the upstream, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}
