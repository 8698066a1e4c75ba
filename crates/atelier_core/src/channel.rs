//! Upstream provider channels.

use serde::{Deserialize, Serialize};

/// The closed set of upstream API shapes a channel can speak.
///
/// # Examples
///
/// ```
/// use atelier_core::ChannelType;
/// use std::str::FromStr;
///
/// assert_eq!(ChannelType::from_str("flow2api").unwrap(), ChannelType::Flow2Api);
/// assert_eq!(ChannelType::OpenAiCompatible.to_string(), "openai-compatible");
/// assert!(ChannelType::Grok2Api.is_chat_completion());
/// assert!(!ChannelType::Sora.is_chat_completion());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum ChannelType {
    /// Native Sora video API
    #[serde(rename = "sora")]
    #[strum(serialize = "sora")]
    Sora,
    /// Flow (Veo) behind a chat-completion proxy
    #[serde(rename = "flow2api")]
    #[strum(serialize = "flow2api")]
    Flow2Api,
    /// Grok Imagine behind a chat-completion proxy
    #[serde(rename = "grok2api")]
    #[strum(serialize = "grok2api")]
    Grok2Api,
    /// Any OpenAI-compatible chat-completion endpoint that answers with a video link
    #[serde(rename = "openai-compatible")]
    #[strum(serialize = "openai-compatible")]
    OpenAiCompatible,
}

impl ChannelType {
    /// True for channels reached through `POST /v1/chat/completions`.
    pub fn is_chat_completion(self) -> bool {
        match self {
            ChannelType::Sora => false,
            ChannelType::Flow2Api | ChannelType::Grok2Api | ChannelType::OpenAiCompatible => true,
        }
    }
}

/// An upstream provider credential set for video generation.
///
/// Channels are created and edited through the admin console; Atelier only reads them.
///
/// ```toml
/// [[channels]]
/// id = "flow-main"
/// name = "Flow"
/// type = "flow2api"
/// base_url = "https://flow.example.com"
/// api_key = "sk-..."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoChannel {
    /// Stable identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Upstream API shape
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// Base URL of the upstream API
    #[serde(default)]
    pub base_url: String,
    /// Bearer token for the upstream API
    #[serde(default)]
    pub api_key: String,
    /// Whether the channel accepts new generations
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}
