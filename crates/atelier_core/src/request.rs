//! Generation requests.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A file attached to a generation request, carried inline as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    /// Base64 payload, optionally already wrapped as a `data:` URL
    pub data: String,
}

impl Attachment {
    /// Create an attachment.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// True for `image/*` attachments.
    pub fn is_image(&self) -> bool {
        self.mime_type.trim().to_ascii_lowercase().starts_with("image/")
    }

    /// True for `video/*` attachments.
    pub fn is_video(&self) -> bool {
        self.mime_type.trim().to_ascii_lowercase().starts_with("video/")
    }

    /// Inline `data:` URL for the payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_core::Attachment;
    ///
    /// let a = Attachment::new("image/png", "iVBORw0KGgo=");
    /// assert_eq!(a.data_url(), "data:image/png;base64,iVBORw0KGgo=");
    ///
    /// let b = Attachment::new("image/png", "data:image/jpeg;base64,/9j/");
    /// assert_eq!(b.data_url(), "data:image/jpeg;base64,/9j/");
    /// ```
    pub fn data_url(&self) -> String {
        let data = self.data.trim();
        if data.starts_with("data:") {
            data.to_string()
        } else {
            format!("data:{};base64,{}", self.mime_type.trim(), data)
        }
    }
}

/// A user-facing video generation request.
///
/// # Examples
///
/// ```
/// use atelier_core::{Attachment, SoraGenerateRequest};
///
/// let request = SoraGenerateRequest::builder()
///     .prompt("a cat surfing at dawn")
///     .model("veo-i2v")
///     .aspect_ratio(Some("9:16".to_string()))
///     .files(vec![Attachment::new("image/png", "iVBORw0KGgo=")])
///     .build()
///     .unwrap();
///
/// assert_eq!(request.prompt(), "a cat surfing at dawn");
/// assert_eq!(request.duration(), &None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct SoraGenerateRequest {
    /// Prompt as typed by the user
    prompt: String,
    /// Model identifier
    model: String,
    /// Channel the model is expected to belong to
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    channel_id: Option<String>,
    /// Requested aspect ratio
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<String>,
    /// Requested duration label
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
    /// Attached files
    #[builder(default)]
    #[serde(default)]
    files: Vec<Attachment>,
    /// Style preset identifier
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style_id: Option<String>,
    /// Video to remix
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remix_target_id: Option<String>,
}

impl SoraGenerateRequest {
    /// Creates a new builder for `SoraGenerateRequest`.
    pub fn builder() -> SoraGenerateRequestBuilder {
        SoraGenerateRequestBuilder::default()
    }

    /// Copy of this request with a different prompt.
    pub fn with_prompt(&self, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..self.clone()
        }
    }

    /// Image attachments only.
    pub fn images(&self) -> impl Iterator<Item = &Attachment> {
        self.files.iter().filter(|f| f.is_image())
    }
}
