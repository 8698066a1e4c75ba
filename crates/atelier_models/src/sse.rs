//! Server-sent-event decoding for streamed chat completions.

use serde_json::Value;
use tracing::debug;

/// One decoded `data:` frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    /// A JSON chunk
    Data(Value),
    /// The `[DONE]` sentinel
    Done,
    /// An `{"error": ...}` frame
    Error(String),
}

impl SseEvent {
    /// True for events after which the stream carries nothing useful.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error(_))
    }

    /// `choices[0].delta.content` of a data chunk.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_models::SseEvent;
    /// use serde_json::json;
    ///
    /// let event = SseEvent::Data(json!({"choices": [{"delta": {"content": "hi"}}]}));
    /// assert_eq!(event.delta_content(), Some("hi"));
    /// assert_eq!(SseEvent::Done.delta_content(), None);
    /// ```
    pub fn delta_content(&self) -> Option<&str> {
        match self {
            Self::Data(value) => value
                .get("choices")?
                .get(0)?
                .get("delta")?
                .get("content")?
                .as_str(),
            _ => None,
        }
    }
}

/// Line-buffered decoder for a `text/event-stream` body.
///
/// Chunks may split lines, and even UTF-8 sequences, anywhere; only complete lines
/// are decoded. Lines other than `data:` frames (comments, `event:`, `id:`) are ignored,
/// as are frames whose payload is not JSON.
///
/// # Examples
///
/// ```
/// use atelier_models::{SseDecoder, SseEvent};
///
/// let mut decoder = SseDecoder::default();
/// assert!(decoder.push(b"data: {\"a\"").is_empty());
/// let events = decoder.push(b": 1}\n\ndata: [DONE]\n");
/// assert_eq!(events.len(), 2);
/// assert_eq!(events[1], SseEvent::Done);
/// ```
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Feed a chunk, returning the events completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(event) = decode_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    /// Decode whatever is left once the body ends without a trailing newline.
    pub fn finish(&mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&String::from_utf8_lossy(&rest))
    }
}

fn decode_line(line: &str) -> Option<SseEvent> {
    let data = line
        .trim_end_matches(['\r', '\n'])
        .strip_prefix("data:")?
        .trim();
    if data.is_empty() {
        return None;
    }
    if data == "[DONE]" {
        return Some(SseEvent::Done);
    }
    match serde_json::from_str::<Value>(data) {
        Ok(value) => match value.get("error") {
            Some(error) if !error.is_null() => Some(SseEvent::Error(error_message(error))),
            _ => Some(SseEvent::Data(value)),
        },
        Err(e) => {
            debug!(error = %e, "Skipping non-JSON event frame");
            None
        }
    }
}

fn error_message(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        _ => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
    }
}
