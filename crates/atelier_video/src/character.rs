//! Character cards: turning an uploaded video into a reusable Sora cameo.

use atelier_core::{Attachment, Endpoint, HttpSettings, LogContext};
use atelier_error::{AtelierResult, ExtractionError, HttpError, RequestError};
use atelier_models::{
    ChatCompletionClient, ChatMessage, ChatRequest, ClientProfile, ContentPart, SseEvent,
    strip_code_fences,
};
use futures_util::StreamExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Sent with the uploaded video.
pub const CHARACTER_CARD_INSTRUCTION: &str = "Create a character from this video. \
    Reply with JSON containing username, display_name and avatar_url.";

static HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([A-Za-z0-9_][A-Za-z0-9_.]*[A-Za-z0-9_])").expect("valid handle pattern")
});

/// A created character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCard {
    /// Handle, without the leading `@`
    pub username: String,
    /// Human-readable name
    pub display_name: String,
    /// Avatar image, when the upstream reports one
    pub avatar_url: Option<String>,
}

/// Parse the accumulated reply of a character upload.
///
/// Accepts a JSON object (`username`/`handle`, `display_name`/`displayName`/`name`,
/// `avatar_url`/`avatarUrl`/`avatar`) or free text containing an `@handle`.
///
/// # Examples
///
/// ```
/// use atelier_video::parse_character_card;
///
/// let card = parse_character_card(r#"{"username": "@neo.cat", "display_name": "Neo"}"#).unwrap();
/// assert_eq!(card.username, "neo.cat");
/// assert_eq!(card.display_name, "Neo");
///
/// let card = parse_character_card("Character ready: @mochi_42.").unwrap();
/// assert_eq!(card.username, "mochi_42");
/// assert_eq!(card.display_name, "mochi_42");
///
/// assert!(parse_character_card("upload failed").is_none());
/// ```
pub fn parse_character_card(reply: &str) -> Option<CharacterCard> {
    let text = strip_code_fences(reply);
    from_json(text).or_else(|| from_handle(text))
}

fn from_json(text: &str) -> Option<CharacterCard> {
    let value: Value = serde_json::from_str(text).ok()?;
    let value = value.get("character").unwrap_or(&value);
    let field = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| value.get(*k).and_then(Value::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let username = field(&["username", "handle"])?
        .trim_start_matches('@')
        .to_string();
    if username.is_empty() {
        return None;
    }
    Some(CharacterCard {
        display_name: field(&["display_name", "displayName", "name"])
            .unwrap_or_else(|| username.clone()),
        avatar_url: field(&["avatar_url", "avatarUrl", "avatar"]),
        username,
    })
}

fn from_handle(text: &str) -> Option<CharacterCard> {
    let caps = HANDLE.captures(text)?;
    let username = caps.get(1)?.as_str().to_string();
    Some(CharacterCard {
        display_name: username.clone(),
        avatar_url: None,
        username,
    })
}

/// Uploads videos as streamed chat completions on the long-running pool.
#[derive(Debug, Clone)]
pub struct CharacterCardClient {
    client: ChatCompletionClient,
    log: LogContext,
}

impl CharacterCardClient {
    /// Create a client with its own long-running connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(settings: HttpSettings, log: LogContext) -> AtelierResult<Self> {
        Ok(Self {
            client: ChatCompletionClient::with_profile(settings, ClientProfile::LongRunning)?,
            log: log.child("character"),
        })
    }

    /// Upload `video` to `model` at `endpoint` and parse the resulting character.
    ///
    /// The event stream is read until its completion or error sentinel; the connection
    /// is released as soon as either arrives.
    ///
    /// # Errors
    ///
    /// Returns a request error for non-video attachments, an HTTP error when the upstream
    /// fails or sends an error event, and an extraction error when the reply names no
    /// character.
    pub async fn create(
        &self,
        endpoint: &Endpoint,
        model: &str,
        video: &Attachment,
    ) -> AtelierResult<CharacterCard> {
        self.log.instrument(self.run(endpoint, model, video)).await
    }

    async fn run(
        &self,
        endpoint: &Endpoint,
        model: &str,
        video: &Attachment,
    ) -> AtelierResult<CharacterCard> {
        if !video.is_video() {
            return Err(RequestError::new(format!(
                "character cards need a video, got '{}'",
                video.mime_type
            ))
            .into());
        }

        let request = ChatRequest::new(
            model.trim(),
            vec![ChatMessage::user_parts(vec![
                ContentPart::text(CHARACTER_CARD_INSTRUCTION),
                ContentPart::video(video.data_url()),
            ])],
        );

        let mut events = self.client.stream(endpoint, &request).await?;
        let mut reply = String::new();
        while let Some(event) = events.next().await {
            let event = event?;
            match &event {
                SseEvent::Data(_) => {
                    if let Some(delta) = event.delta_content() {
                        reply.push_str(delta);
                    }
                }
                SseEvent::Done => break,
                SseEvent::Error(message) => {
                    return Err(
                        HttpError::new(format!("Character upload failed: {}", message)).into(),
                    );
                }
            }
        }
        drop(events);
        debug!(reply_len = reply.len(), "Character stream finished");

        let card = parse_character_card(&reply)
            .ok_or_else(|| ExtractionError::new("character reply names no username"))?;
        info!(username = %card.username, "Character created");
        Ok(card)
    }
}
