//! Native Sora video API: legacy model names, job creation, polling and link retrieval.

use async_trait::async_trait;
use atelier_core::{DurationBucket, Endpoint, HttpSettings, Orientation, SoraSettings};
use atelier_error::{AtelierResult, ExtractionError, HttpError, JsonError};
use atelier_models::{ChatCompletionClient, v1_url, with_retry};
use derive_getters::Getters;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// What a legacy `sora2-{ratio}-{duration}` model name stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegacySoraModel {
    /// Model identifier of the native API
    pub api_model: &'static str,
    /// Frame orientation
    pub orientation: Orientation,
    /// Duration tier
    pub duration: DurationBucket,
    /// Output size in pixels, `WxH`
    pub size: &'static str,
}

/// Parse a legacy model name such as `sora2-landscape-10s`, `sora2pro-9:16-15s`
/// or `sora2-portrait`.
///
/// Missing parts default to landscape and 10 seconds; an unrecognised duration also
/// falls back to 10 seconds. Returns `None` unless the name starts with `sora2` or
/// `sora2pro`.
///
/// # Examples
///
/// ```
/// use atelier_core::{DurationBucket, Orientation};
/// use atelier_video::parse_legacy_sora_model;
///
/// let legacy = parse_legacy_sora_model("sora2pro-portrait-15s").unwrap();
/// assert_eq!(legacy.api_model, "sora-2-pro");
/// assert_eq!(legacy.orientation, Orientation::Portrait);
/// assert_eq!(legacy.duration, DurationBucket::Fifteen);
/// assert_eq!(legacy.size, "1024x1792");
///
/// assert!(parse_legacy_sora_model("sora-2").is_none());
/// ```
pub fn parse_legacy_sora_model(name: &str) -> Option<LegacySoraModel> {
    let lowered = name.trim().to_ascii_lowercase();
    let mut parts = lowered.split('-');
    let pro = match parts.next()? {
        "sora2" => false,
        "sora2pro" => true,
        _ => return None,
    };

    let mut orientation = Orientation::Landscape;
    let mut duration = DurationBucket::Ten;
    for part in parts {
        if let Some(o) = Orientation::from_aspect_ratio(part) {
            orientation = o;
        } else {
            duration = DurationBucket::from_label(part);
        }
    }
    let orientation = orientation.without_square();

    Some(LegacySoraModel {
        api_model: if pro { "sora-2-pro" } else { "sora-2" },
        orientation,
        duration,
        size: sora_size(pro, orientation),
    })
}

/// Pixel size for a Sora tier and orientation. Square renders as landscape.
pub fn sora_size(pro: bool, orientation: Orientation) -> &'static str {
    match (pro, orientation.without_square()) {
        (false, Orientation::Portrait) => "720x1280",
        (false, _) => "1280x720",
        (true, Orientation::Portrait) => "1024x1792",
        (true, _) => "1792x1024",
    }
}

/// Body of `POST /v1/videos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SoraJob {
    /// Native model identifier
    model: String,
    /// Prompt after processing
    prompt: String,
    /// Duration in whole seconds
    seconds: String,
    /// Output size, `WxH`
    size: String,
    /// First-frame image as a data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_reference: Option<String>,
    /// Video being remixed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remix_video_id: Option<String>,
    /// Style preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style_id: Option<String>,
}

impl SoraJob {
    /// A text-to-video job.
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        duration: DurationBucket,
        size: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            seconds: duration.seconds().to_string(),
            size: size.into(),
            input_reference: None,
            remix_video_id: None,
            style_id: None,
        }
    }

    /// Start from a reference image (data URL).
    pub fn with_input_reference(mut self, data_url: Option<String>) -> Self {
        self.input_reference = data_url;
        self
    }

    /// Remix an existing video.
    pub fn with_remix(mut self, video_id: Option<String>) -> Self {
        self.remix_video_id = video_id;
        self
    }

    /// Apply a style preset.
    pub fn with_style(mut self, style_id: Option<String>) -> Self {
        self.style_id = style_id;
        self
    }
}

/// A finished Sora video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoraVideo {
    /// Download URL, unwatermarked when the link service is configured
    pub url: String,
    /// Public share page
    pub permalink: Option<String>,
    /// Prompt as rewritten by the upstream
    pub revised_prompt: Option<String>,
}

/// Seam for the native Sora generation flow.
#[async_trait]
pub trait SoraBackend: Send + Sync {
    /// Run `job` against the channel at `endpoint` until a video is ready.
    async fn generate(&self, endpoint: &Endpoint, job: &SoraJob) -> AtelierResult<SoraVideo>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobState {
    Pending,
    Completed,
    Failed,
}

/// Fields of a job status body that matter here.
#[derive(Debug, Clone)]
struct JobStatus {
    id: Option<String>,
    state: JobState,
    url: Option<String>,
    permalink: Option<String>,
    revised_prompt: Option<String>,
    error: Option<String>,
}

impl JobStatus {
    fn from_value(value: &Value) -> Self {
        let status = str_at(value, &["status"]).unwrap_or_default().to_ascii_lowercase();
        let state = match status.as_str() {
            "completed" | "succeeded" | "success" => JobState::Completed,
            "failed" | "error" | "cancelled" | "canceled" => JobState::Failed,
            _ => JobState::Pending,
        };
        let error = match value.get("error") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => str_at(other, &["message"]),
            None => None,
        };
        Self {
            id: str_at(value, &["id"]),
            state,
            url: first_str(
                value,
                &[
                    &["url"],
                    &["video_url"],
                    &["download_url"],
                    &["output", "url"],
                    &["result", "url"],
                ],
            ),
            permalink: first_str(value, &[&["permalink"], &["share_url"]]),
            revised_prompt: str_at(value, &["revised_prompt"]),
            error,
        }
    }
}

fn str_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    let s = current.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn first_str(value: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| str_at(value, path))
}

/// [`SoraBackend`] over the OpenAI-style `/v1/videos` API.
#[derive(Debug, Clone)]
pub struct SoraApiClient {
    http: Client,
    http_settings: HttpSettings,
    sora: SoraSettings,
}

impl SoraApiClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(http_settings: HttpSettings, sora: SoraSettings) -> AtelierResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(http_settings.timeout_secs))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            http_settings,
            sora,
        })
    }

    /// Create a client on the connection pool of `chat`, with its retry settings.
    pub fn sharing(chat: &ChatCompletionClient, sora: SoraSettings) -> Self {
        Self {
            http: chat.http().clone(),
            http_settings: *chat.settings(),
            sora,
        }
    }

    async fn send_json(&self, request: RequestBuilder) -> AtelierResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Sora request failed: {}", e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read Sora response: {}", e)))?;
        if !status.is_success() {
            return Err(HttpError::with_status(status.as_u16(), body).into());
        }
        serde_json::from_str(&body)
            .map_err(|e| JsonError::new(format!("Failed to parse Sora response: {}", e)).into())
    }

    async fn create(&self, endpoint: &Endpoint, job: &SoraJob) -> AtelierResult<JobStatus> {
        let url = v1_url(endpoint, "videos");
        let key = endpoint.api_key.trim();
        let body = with_retry(&self.http_settings, || {
            self.send_json(self.http.post(&url).bearer_auth(key).json(job))
        })
        .await?;
        Ok(JobStatus::from_value(&body))
    }

    async fn poll(&self, endpoint: &Endpoint, id: &str) -> AtelierResult<JobStatus> {
        let url = v1_url(endpoint, &format!("videos/{}", id));
        let key = endpoint.api_key.trim();
        let interval = Duration::from_secs(self.sora.poll_interval_secs);

        for attempt in 1..=self.sora.max_polls {
            tokio::time::sleep(interval).await;
            let body = with_retry(&self.http_settings, || {
                self.send_json(self.http.get(&url).bearer_auth(key))
            })
            .await?;
            let status = JobStatus::from_value(&body);
            if status.state != JobState::Pending {
                return Ok(status);
            }
            debug!(id, attempt, "Sora job still running");
        }

        Err(HttpError::new(format!(
            "Sora job {} did not finish after {} polls",
            id, self.sora.max_polls
        ))
        .into())
    }

    /// Exchange a share permalink for an unwatermarked download link.
    async fn unwatermarked_link(
        &self,
        service: &Endpoint,
        permalink: &str,
    ) -> AtelierResult<String> {
        let url = format!("{}/get-sora-link", service.trimmed_base());
        let key = service.api_key.trim();
        let body = json!({ "url": permalink });
        let reply = with_retry(&self.http_settings, || {
            self.send_json(self.http.post(&url).bearer_auth(key).json(&body))
        })
        .await?;
        first_str(&reply, &[&["link"], &["url"], &["download_url"], &["data", "link"]])
            .ok_or_else(|| ExtractionError::new("link service reply carries no link").into())
    }
}

#[async_trait]
impl SoraBackend for SoraApiClient {
    #[instrument(skip(self, endpoint, job), fields(model = %job.model, size = %job.size))]
    async fn generate(&self, endpoint: &Endpoint, job: &SoraJob) -> AtelierResult<SoraVideo> {
        endpoint.require("sora channel")?;

        let created = self.create(endpoint, job).await?;
        let status = match created.state {
            JobState::Pending => {
                let id = created
                    .id
                    .clone()
                    .ok_or_else(|| ExtractionError::new("Sora job reply carries no id"))?;
                info!(id = %id, "Sora job created");
                self.poll(endpoint, &id).await?
            }
            _ => created,
        };

        if status.state == JobState::Failed {
            return Err(HttpError::new(format!(
                "Sora job failed: {}",
                status.error.as_deref().unwrap_or("no reason given")
            ))
            .into());
        }

        let url = match (&status.url, &status.id) {
            (Some(url), _) => url.clone(),
            (None, Some(id)) => v1_url(endpoint, &format!("videos/{}/content", id)),
            (None, None) => {
                return Err(ExtractionError::new("Sora job reply carries no video").into());
            }
        };

        let url = match (self.sora.link_service(), &status.permalink) {
            (Some(service), Some(permalink)) => self.unwatermarked_link(service, permalink).await?,
            _ => url,
        };

        Ok(SoraVideo {
            url,
            permalink: status.permalink,
            revised_prompt: status.revised_prompt,
        })
    }
}
