//! HTTP client for OpenAI-compatible chat-completion endpoints.

use crate::{ChatCompletion, ChatRequest, SseDecoder, SseEvent, with_retry};
use async_trait::async_trait;
use atelier_core::{Endpoint, HttpSettings};
use atelier_error::{AtelierError, AtelierResult, HttpError, JsonError};
use derive_getters::Getters;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, instrument};

/// Connect timeout for every profile.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// TCP keepalive interval of the long-running pool.
const KEEPALIVE_SECS: u64 = 60;

/// A stream of decoded server-sent events.
pub type EventStream = Pin<Box<dyn Stream<Item = AtelierResult<SseEvent>> + Send>>;

/// Seam for anything that can answer a chat completion.
///
/// Implemented by [`ChatCompletionClient`]; tests substitute a mock.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Send a non-streaming request to `endpoint` and return the decoded body.
    async fn complete(
        &self,
        endpoint: &Endpoint,
        request: &ChatRequest,
    ) -> AtelierResult<ChatCompletion>;
}

/// Connection pool flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum ClientProfile {
    /// Whole-request timeout from [`HttpSettings::timeout_secs`]
    #[default]
    Standard,
    /// Dedicated pool with no body timeout and TCP keepalive, for uploads and
    /// streamed responses that can run for minutes
    LongRunning,
}

/// Build `{base}/v1/{path}`, tolerating a base that already ends in `/v1`.
///
/// # Examples
///
/// ```
/// use atelier_core::Endpoint;
/// use atelier_models::v1_url;
///
/// let plain = Endpoint::new("https://api.example.com/", "k");
/// assert_eq!(v1_url(&plain, "chat/completions"), "https://api.example.com/v1/chat/completions");
///
/// let versioned = Endpoint::new("https://api.example.com/v1", "k");
/// assert_eq!(v1_url(&versioned, "videos"), "https://api.example.com/v1/videos");
/// ```
pub fn v1_url(endpoint: &Endpoint, path: &str) -> String {
    let base = endpoint.trimmed_base();
    let path = path.trim_start_matches('/');
    if base.ends_with("/v1") {
        format!("{}/{}", base, path)
    } else {
        format!("{}/v1/{}", base, path)
    }
}

/// Chat-completion client over `reqwest`.
#[derive(Debug, Clone, Getters)]
pub struct ChatCompletionClient {
    #[getter(skip)]
    http: Client,
    settings: HttpSettings,
    profile: ClientProfile,
}

impl ChatCompletionClient {
    /// A client on the standard pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(settings: HttpSettings) -> AtelierResult<Self> {
        Self::with_profile(settings, ClientProfile::Standard)
    }

    /// A client on the given pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip(settings))]
    pub fn with_profile(settings: HttpSettings, profile: ClientProfile) -> AtelierResult<Self> {
        let builder = Client::builder().connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS));
        let builder = match profile {
            ClientProfile::Standard => builder.timeout(Duration::from_secs(settings.timeout_secs)),
            ClientProfile::LongRunning => builder
                .tcp_keepalive(Duration::from_secs(KEEPALIVE_SECS))
                .pool_max_idle_per_host(4),
        };
        let http = builder
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            settings,
            profile,
        })
    }

    /// The underlying `reqwest` client, for other calls that share this pool.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// One POST, mapping transport failures and non-2xx statuses to [`HttpError`].
    async fn send(
        &self,
        endpoint: &Endpoint,
        request: &ChatRequest,
    ) -> AtelierResult<reqwest::Response> {
        let url = v1_url(endpoint, "chat/completions");
        debug!(
            url = %url,
            model = %request.model,
            stream = request.stream,
            "Sending chat completion"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(endpoint.api_key.trim())
            .json(request)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::with_status(status.as_u16(), body).into());
        }
        Ok(response)
    }

    async fn complete_once(
        &self,
        endpoint: &Endpoint,
        request: &ChatRequest,
    ) -> AtelierResult<ChatCompletion> {
        let response = self.send(endpoint, request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read response body: {}", e)))?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| JsonError::new(format!("Failed to parse chat completion: {}", e)))?;
        Ok(ChatCompletion::new(value))
    }

    /// Send a streaming request and decode its events.
    ///
    /// Opening the stream is retried like [`ChatCompleter::complete`]; the stream itself
    /// ends after the first [`SseEvent::Done`] or [`SseEvent::Error`], dropping the
    /// response so its connection goes back to the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not configured or the upstream rejects the
    /// request. Read failures mid-stream arrive as `Err` items.
    #[instrument(
        skip(self, endpoint, request),
        fields(model = %request.model, profile = %self.profile)
    )]
    pub async fn stream(
        &self,
        endpoint: &Endpoint,
        request: &ChatRequest,
    ) -> AtelierResult<EventStream> {
        endpoint.require("chat completion")?;
        let request = request.clone().streaming();
        let response = with_retry(&self.settings, || self.send(endpoint, &request)).await?;

        let mut bytes = Box::pin(response.bytes_stream());
        let read_failed = |e: reqwest::Error| -> AtelierResult<SseEvent> {
            Err(AtelierError::from(HttpError::new(format!(
                "Stream read failed: {}",
                e
            ))))
        };

        let events = async_stream::stream! {
            let mut decoder = SseDecoder::default();
            let mut finished = false;
            'read: while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield read_failed(e);
                        finished = true;
                        break 'read;
                    }
                };
                for event in decoder.push(&chunk) {
                    let terminal = event.is_terminal();
                    yield Ok(event);
                    if terminal {
                        finished = true;
                        break 'read;
                    }
                }
            }
            if !finished {
                if let Some(event) = decoder.finish() {
                    yield Ok(event);
                }
            }
        };
        Ok(Box::pin(events))
    }
}

#[async_trait]
impl ChatCompleter for ChatCompletionClient {
    #[instrument(skip(self, endpoint, request), fields(model = %request.model))]
    async fn complete(
        &self,
        endpoint: &Endpoint,
        request: &ChatRequest,
    ) -> AtelierResult<ChatCompletion> {
        endpoint.require("chat completion")?;
        with_retry(&self.settings, || self.complete_once(endpoint, request)).await
    }
}
