//! Test utilities for prompt processor tests.

use async_trait::async_trait;
use atelier_core::Endpoint;
use atelier_error::{AtelierResult, HttpError};
use atelier_models::{ChatCompleter, ChatCompletion, ChatRequest};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the mock answers with.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockReply {
    /// `choices[0].message.content` set to this text
    Content(String),
    /// A raw body
    Raw(Value),
    /// An upstream status error
    Status(u16),
}

/// Chat completer that replays queued replies and records every request.
#[derive(Debug, Default)]
pub struct MockChatCompleter {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

#[allow(dead_code)]
impl MockChatCompleter {
    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_contents(contents: &[&str]) -> Self {
        Self::with_replies(contents.iter().map(|c| MockReply::Content(c.to_string())))
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
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
        _endpoint: &Endpoint,
        request: &ChatRequest,
    ) -> AtelierResult<ChatCompletion> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock ran out of replies");
        match reply {
            MockReply::Content(text) => Ok(ChatCompletion::new(json!({
                "choices": [{"message": {"role": "assistant", "content": text}}]
            }))),
            MockReply::Raw(value) => Ok(ChatCompletion::new(value)),
            MockReply::Status(status) => Err(HttpError::with_status(status, "mock failure").into()),
        }
    }
}
