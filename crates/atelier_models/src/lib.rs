//! OpenAI-compatible chat-completion client for the Atelier generation gateway.
//!
//! Both the prompt processor and the video adapter talk to upstream models through
//! `POST {base}/v1/chat/completions`. This crate owns that call:
//!
//! - [`ChatRequest`] / [`ChatMessage`] build the request body, including inline
//!   image and video attachments as data URLs
//! - [`ChatCompletionClient`] sends it with bearer auth and retries transient failures
//! - [`extract_text`] pulls text out of the many response shapes upstreams return
//! - [`SseDecoder`] turns a streamed body into [`SseEvent`]s
//!
//! Callers depend on the [`ChatCompleter`] trait so tests can substitute a mock.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod request;
mod response;
mod retry;
mod sse;

pub use client::{ChatCompleter, ChatCompletionClient, ClientProfile, EventStream, v1_url};
pub use request::{ChatMessage, ChatRequest, ContentPart, MediaUrl, MessageContent, Role};
pub use response::{ChatCompletion, extract_text, strip_code_fences};
pub use retry::with_retry;
pub use sse::{SseDecoder, SseEvent};
