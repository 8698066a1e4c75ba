//! Chat-completion request bodies.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Instructions
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
}

/// A URL wrapper as used by `image_url` and `video_url` parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUrl {
    /// An `https://` or `data:` URL
    pub url: String,
}

/// One part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
    /// An image, usually an inline data URL
    ImageUrl {
        /// Where the image is
        image_url: MediaUrl,
    },
    /// A video, usually an inline data URL
    VideoUrl {
        /// Where the video is
        video_url: MediaUrl,
    },
}

impl ContentPart {
    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// An image part.
    pub fn image(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: MediaUrl { url: url.into() },
        }
    }

    /// A video part.
    pub fn video(url: impl Into<String>) -> Self {
        Self::VideoUrl {
            video_url: MediaUrl { url: url.into() },
        }
    }
}

/// Message content: a bare string, or a list of parts once attachments are involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Text only
    Text(String),
    /// Text plus media
    Parts(Vec<ContentPart>),
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: Role,
    /// Body
    pub content: MessageContent,
}

impl ChatMessage {
    /// A system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A text-only user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message made of parts.
    ///
    /// Collapses to plain text when the only part is text.
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        let content = match parts.as_slice() {
            [ContentPart::Text { text }] => MessageContent::Text(text.clone()),
            _ => MessageContent::Parts(parts),
        };
        Self {
            role: Role::User,
            content,
        }
    }
}

/// Body of `POST /v1/chat/completions`.
///
/// # Examples
///
/// ```
/// use atelier_models::{ChatMessage, ChatRequest};
///
/// let request = ChatRequest::new("gpt-4o-mini", vec![ChatMessage::user("hello")]).streaming();
/// let body = serde_json::to_value(&request).unwrap();
/// assert_eq!(body["model"], "gpt-4o-mini");
/// assert_eq!(body["messages"][0]["content"], "hello");
/// assert_eq!(body["stream"], true);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Upstream model identifier
    pub model: String,
    /// Conversation
    pub messages: Vec<ChatMessage>,
    /// Ask for a server-sent-event stream
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

impl ChatRequest {
    /// A non-streaming request.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
        }
    }

    /// The same request, streamed.
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}
