//! Test utilities for generation service tests.

use async_trait::async_trait;
use atelier::{
    AtelierResult, Blocklist, BlocklistPolicy, ChannelType, ChatCompleter, ChatCompletion,
    ChatRequest, ContentPart, Endpoint, GenerationService, HttpError, LogContext, MessageContent,
    ModelCatalog, PricingTable, PromptProcessor, PromptSettings, SoraBackend, SoraJob, SoraVideo,
    StageSettings, VideoAdapter, VideoChannel, VideoModel,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Chat completer that answers with queued message contents and records requests.
#[derive(Debug, Default)]
pub struct MockChatCompleter {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

#[allow(dead_code)]
impl MockChatCompleter {
    pub fn with_contents(contents: &[&str]) -> Self {
        Self {
            replies: Mutex::new(contents.iter().map(|c| c.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Text part of the first user message of request `index`.
    pub fn sent_text(&self, index: usize) -> String {
        let requests = self.requests();
        let message = requests[index].messages.last().unwrap();
        match &message.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .find_map(|p| match p {
                    ContentPart::Text { text } => Some(text.clone()),
                    _ => None,
                })
                .unwrap(),
        }
    }
}

#[async_trait]
impl ChatCompleter for MockChatCompleter {
    async fn complete(
        &self,
        _endpoint: &Endpoint,
        request: &ChatRequest,
    ) -> AtelierResult<ChatCompletion> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(text) => Ok(ChatCompletion::new(json!({
                "choices": [{"message": {"role": "assistant", "content": text}}]
            }))),
            None => Err(HttpError::with_status(500, "mock ran out of replies").into()),
        }
    }
}

/// Sora backend that records jobs and returns a fixed video.
#[derive(Debug, Default)]
pub struct MockSoraBackend {
    jobs: Mutex<Vec<SoraJob>>,
}

#[allow(dead_code)]
impl MockSoraBackend {
    pub fn jobs(&self) -> Vec<SoraJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl SoraBackend for MockSoraBackend {
    async fn generate(&self, _endpoint: &Endpoint, job: &SoraJob) -> AtelierResult<SoraVideo> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(SoraVideo {
            url: "https://videos.example.com/sora.mp4".to_string(),
            permalink: None,
            revised_prompt: None,
        })
    }
}

/// Mocks wired into a service, kept for inspection.
#[allow(dead_code)]
pub struct Harness {
    pub service: GenerationService,
    pub prompt_chat: Arc<MockChatCompleter>,
    pub video_chat: Arc<MockChatCompleter>,
    pub sora: Arc<MockSoraBackend>,
}

fn channel(id: &str, channel_type: ChannelType) -> VideoChannel {
    VideoChannel {
        id: id.to_string(),
        name: id.to_string(),
        channel_type,
        base_url: format!("https://{}.example.com", id),
        api_key: "sk-channel".to_string(),
        enabled: true,
    }
}

fn model(id: &str, channel_id: &str, api_model: &str) -> VideoModel {
    serde_json::from_value(json!({
        "id": id,
        "channel_id": channel_id,
        "api_model": api_model,
    }))
    .unwrap()
}

/// Catalog with a Flow model (`veo`) and a Sora model (`sora`).
pub fn catalog() -> ModelCatalog {
    ModelCatalog::new(
        vec![channel("flow", ChannelType::Flow2Api), channel("sora", ChannelType::Sora)],
        vec![
            model("veo", "flow", "veo-t2v"),
            model("sora", "sora", "sora2-landscape-10s"),
        ],
    )
}

/// Filter stage on with the given model replies, blocklist from `rules`.
#[allow(dead_code)]
pub fn harness(filter_replies: Option<&[&str]>, rules: &str, video_replies: &[&str]) -> Harness {
    let prompt_chat = Arc::new(MockChatCompleter::with_contents(
        filter_replies.unwrap_or_default(),
    ));
    let video_chat = Arc::new(MockChatCompleter::with_contents(video_replies));
    let sora = Arc::new(MockSoraBackend::default());

    let mut settings = PromptSettings::default();
    if filter_replies.is_some() {
        settings.filter = StageSettings {
            enabled: true,
            model: "gpt-filter".to_string(),
            instruction: String::new(),
        };
    }
    let prompt = PromptProcessor::new(
        settings,
        Endpoint::new("https://chat.example.com", "sk-chat"),
        prompt_chat.clone(),
        LogContext::disabled(),
    )
    .unwrap();
    let blocklist = BlocklistPolicy::new(
        true,
        Arc::new(Blocklist::parse(rules)),
        LogContext::disabled(),
    );
    let adapter = VideoAdapter::new(
        video_chat.clone(),
        sora.clone(),
        PricingTable::default(),
        LogContext::disabled(),
    );

    Harness {
        service: GenerationService::new(
            catalog(),
            prompt,
            blocklist,
            adapter,
            LogContext::disabled(),
        ),
        prompt_chat,
        video_chat,
        sora,
    }
}
