//! Test utilities for video adapter tests.

use async_trait::async_trait;
use atelier_core::{ChannelType, Endpoint, ResolvedModel, VideoChannel, VideoModel};
use atelier_error::{AtelierError, AtelierResult, HttpError};
use atelier_models::{ChatCompleter, ChatCompletion, ChatRequest};
use atelier_video::{SoraBackend, SoraJob, SoraVideo};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Chat completer that answers with queued message contents and records requests.
#[derive(Debug, Default)]
pub struct MockChatCompleter {
    replies: Mutex<VecDeque<AtelierResult<String>>>,
    requests: Mutex<Vec<(Endpoint, ChatRequest)>>,
}

#[allow(dead_code)]
impl MockChatCompleter {
    pub fn with_contents(contents: &[&str]) -> Self {
        Self {
            replies: Mutex::new(contents.iter().map(|c| Ok(c.to_string())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(AtelierError::from(
                HttpError::with_status(status, "mock failure"),
            ))])),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(Endpoint, ChatRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatCompleter for MockChatCompleter {
    async fn complete(
        &self,
        endpoint: &Endpoint,
        request: &ChatRequest,
    ) -> AtelierResult<ChatCompletion> {
        self.requests
            .lock()
            .unwrap()
            .push((endpoint.clone(), request.clone()));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock ran out of replies")?;
        Ok(ChatCompletion::new(json!({
            "choices": [{"message": {"role": "assistant", "content": reply}}]
        })))
    }
}

/// Sora backend that records jobs and returns a fixed video.
#[derive(Debug)]
pub struct MockSoraBackend {
    video: Option<SoraVideo>,
    jobs: Mutex<Vec<SoraJob>>,
}

#[allow(dead_code)]
impl MockSoraBackend {
    pub fn returning(url: &str) -> Self {
        Self {
            video: Some(SoraVideo {
                url: url.to_string(),
                permalink: Some("https://sora.example.com/p/s_1".to_string()),
                revised_prompt: Some("revised".to_string()),
            }),
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn unused() -> Self {
        Self {
            video: None,
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn jobs(&self) -> Vec<SoraJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl SoraBackend for MockSoraBackend {
    async fn generate(&self, _endpoint: &Endpoint, job: &SoraJob) -> AtelierResult<SoraVideo> {
        self.jobs.lock().unwrap().push(job.clone());
        self.video
            .clone()
            .ok_or_else(|| HttpError::new("mock sora backend has no video").into())
    }
}

#[allow(dead_code)]
pub fn channel(id: &str, channel_type: ChannelType) -> VideoChannel {
    VideoChannel {
        id: id.to_string(),
        name: id.to_string(),
        channel_type,
        base_url: format!("https://{}.example.com", id),
        api_key: "sk-test".to_string(),
        enabled: true,
    }
}

#[allow(dead_code)]
pub fn model(id: &str, channel_id: &str, api_model: &str) -> VideoModel {
    serde_json::from_value(json!({
        "id": id,
        "channel_id": channel_id,
        "api_model": api_model,
    }))
    .unwrap()
}

#[allow(dead_code)]
pub fn resolved(channel_type: ChannelType, api_model: &str) -> ResolvedModel {
    ResolvedModel {
        model: model("m", "ch", api_model),
        channel: channel("ch", channel_type),
    }
}
