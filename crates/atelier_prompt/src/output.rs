//! Turning a rewrite model's reply into prompt text.

use atelier_models::strip_code_fences;
use serde_json::Value;

/// JSON fields that may carry the rewritten prompt, in lookup order.
pub const OUTPUT_FIELDS: [&str; 8] = [
    "prompt",
    "rewritten_prompt",
    "filtered_prompt",
    "translated_prompt",
    "translation",
    "result",
    "output",
    "text",
];

/// Prompt text carried by a model reply, or `None` if the reply is effectively empty.
///
/// Code fences are stripped first. A JSON string is used as is; a JSON object yields
/// its first [`OUTPUT_FIELDS`] entry holding a string; anything else is used verbatim.
///
/// # Examples
///
/// ```
/// use atelier_prompt::parse_model_output;
///
/// assert_eq!(
///     parse_model_output("```json\n{\"rewritten_prompt\": \" a calm sea \"}\n```").as_deref(),
///     Some("a calm sea")
/// );
/// assert_eq!(parse_model_output("just text").as_deref(), Some("just text"));
/// assert_eq!(parse_model_output("{\"prompt\": \"\"}"), None);
/// assert_eq!(parse_model_output("  "), None);
/// ```
pub fn parse_model_output(reply: &str) -> Option<String> {
    let text = strip_code_fences(reply);
    if text.is_empty() {
        return None;
    }

    let field = match serde_json::from_str::<Value>(text) {
        Ok(Value::String(s)) => return non_blank(&s),
        Ok(Value::Object(map)) => OUTPUT_FIELDS
            .iter()
            .find_map(|name| map.get(*name).and_then(Value::as_str).map(str::to_string)),
        _ => None,
    };

    match field {
        Some(value) => non_blank(&value),
        None => non_blank(text),
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
