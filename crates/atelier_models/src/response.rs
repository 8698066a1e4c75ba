//! Chat-completion responses and text extraction.

use serde_json::Value;

/// A decoded chat-completion response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    raw: Value,
}

impl ChatCompletion {
    /// Wrap a response body.
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The response body.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The reply text, if any shape of the body carries one.
    pub fn text(&self) -> Option<String> {
        extract_text(&self.raw)
    }
}

impl From<Value> for ChatCompletion {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}

/// Extract reply text from a chat-completion style body.
///
/// Looks, in order, at `choices[0].message.content` (string, list of parts, or
/// object with `text`), `choices[0].text`, top-level `output_text`, `text` and `content`,
/// and finally `output[].content[].text`. Returns `None` when nothing non-blank is found.
///
/// # Examples
///
/// ```
/// use atelier_models::extract_text;
/// use serde_json::json;
///
/// let body = json!({"choices": [{"message": {"content": "hello"}}]});
/// assert_eq!(extract_text(&body).as_deref(), Some("hello"));
///
/// let parts = json!({"choices": [{"message": {"content": [
///     {"type": "text", "text": "a"},
///     {"type": "text", "text": "b"}
/// ]}}]});
/// assert_eq!(extract_text(&parts).as_deref(), Some("ab"));
///
/// assert_eq!(extract_text(&json!({"choices": []})), None);
/// ```
pub fn extract_text(body: &Value) -> Option<String> {
    let choice = body.get("choices").and_then(|c| c.get(0));

    let candidates = [
        choice
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content")),
        choice.and_then(|c| c.get("text")),
        body.get("output_text"),
        body.get("text"),
        body.get("content"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(content_text)
        .or_else(|| output_items_text(body))
}

/// Text of a `content` value: a string, a list of parts, or an object with `text`.
fn content_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts.iter().filter_map(part_text).collect(),
        Value::Object(map) => match map.get("text") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(inner)) => inner.get("value")?.as_str()?.to_string(),
            _ => return None,
        },
        _ => return None,
    };
    non_blank(text)
}

fn part_text(part: &Value) -> Option<String> {
    match part {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            let kind = map.get("type").and_then(Value::as_str);
            if kind.is_some_and(|k| k != "text" && k != "output_text") {
                return None;
            }
            map.get("text").and_then(Value::as_str).map(str::to_string)
        }
        _ => None,
    }
}

/// `output[].content[].text`, as returned by the responses API.
fn output_items_text(body: &Value) -> Option<String> {
    let text: String = body
        .get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter_map(part_text)
        .collect();
    non_blank(text)
}

fn non_blank(text: String) -> Option<String> {
    (!text.trim().is_empty()).then_some(text)
}

/// Remove a surrounding Markdown code fence, if present, and trim.
///
/// # Examples
///
/// ```
/// use atelier_models::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"prompt\": \"x\"}\n```"), "{\"prompt\": \"x\"}");
/// assert_eq!(strip_code_fences("  plain  "), "plain");
/// ```
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
