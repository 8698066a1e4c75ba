//! Locating the video URL in a chat-completion reply.

use atelier_models::strip_code_fences;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static HTML_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<(?:video|source)\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#)
        .expect("valid HTML source pattern")
});

static MARKDOWN_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!?\[[^\]]*\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#)
        .expect("valid Markdown link pattern")
});

static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"'<>()\[\]]+"#).expect("valid bare URL pattern")
});

const VIDEO_EXTENSIONS: [&str; 5] = [".mp4", ".webm", ".mov", ".m4v", ".m3u8"];

/// Find the video URL in reply text.
///
/// Tries, in order: a JSON `{"type": "video", "url": ...}` envelope, an HTML
/// `<video>`/`<source>` tag, a Markdown image or link, then any bare URL that looks like
/// a video (known extension, or `video` in its path).
///
/// # Examples
///
/// ```
/// use atelier_video::extract_video_url;
///
/// assert_eq!(
///     extract_video_url(r#"{"type":"video","url":"https://x/y.mp4"}"#).as_deref(),
///     Some("https://x/y.mp4")
/// );
/// assert_eq!(
///     extract_video_url("<video controls src='https://cdn/a.webm'></video>").as_deref(),
///     Some("https://cdn/a.webm")
/// );
/// assert_eq!(
///     extract_video_url("Done! [watch](https://cdn/clip)").as_deref(),
///     Some("https://cdn/clip")
/// );
/// assert_eq!(extract_video_url("Your video is still rendering"), None);
/// ```
pub fn extract_video_url(content: &str) -> Option<String> {
    let text = strip_code_fences(content);
    if text.is_empty() {
        return None;
    }

    from_json(text)
        .or_else(|| first_capture(&HTML_SRC, text))
        .or_else(|| first_capture(&MARKDOWN_TARGET, text))
        .or_else(|| bare_video_url(text))
}

fn from_json(text: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(text).ok().or_else(|| {
        // Tolerate prose around a single JSON object.
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        serde_json::from_str(text.get(start..=end)?).ok()
    })?;
    url_in_envelope(&value)
}

fn url_in_envelope(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            let kind = map.get("type").and_then(Value::as_str);
            if kind.is_some_and(|k| !k.eq_ignore_ascii_case("video")) {
                return None;
            }
            ["url", "video_url"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(|url| match url {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Object(inner) => {
                        inner.get("url")?.as_str().map(|s| s.trim().to_string())
                    }
                    _ => None,
                })
                .filter(|url| !url.is_empty())
        }
        Value::Array(items) => items.iter().find_map(url_in_envelope),
        _ => None,
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    Some(caps.get(1)?.as_str().trim().to_string())
}

fn bare_video_url(text: &str) -> Option<String> {
    BARE_URL
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']))
        .find(|url| looks_like_video(url))
        .map(str::to_string)
}

/// True for URLs whose path ends in a video extension or mentions `video`.
pub fn looks_like_video(url: &str) -> bool {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .split_once('/')
        .map_or("", |(_, path)| path)
        .to_ascii_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) || path.contains("video")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        LazyLock::force(&HTML_SRC);
        LazyLock::force(&MARKDOWN_TARGET);
        LazyLock::force(&BARE_URL);
    }

    #[test]
    fn test_json_inside_code_fence_and_prose() {
        let reply = "```json\n{\"type\": \"video\", \"url\": \"https://x/a.mp4\"}\n```";
        assert_eq!(extract_video_url(reply).as_deref(), Some("https://x/a.mp4"));

        let reply = "Here you go: {\"url\": \"https://x/b.mp4\"} enjoy";
        assert_eq!(extract_video_url(reply).as_deref(), Some("https://x/b.mp4"));
    }

    #[test]
    fn test_json_image_envelope_is_not_a_video() {
        let reply = r#"{"type": "image", "url": "https://x/a.png"}"#;
        assert_eq!(extract_video_url(reply), None);
    }

    #[test]
    fn test_source_tag() {
        let reply = r#"<video controls><source type="video/mp4" src="https://x/c.mp4"></video>"#;
        assert_eq!(extract_video_url(reply).as_deref(), Some("https://x/c.mp4"));
    }

    #[test]
    fn test_markdown_image() {
        let reply = "![preview](https://x/d.mp4 \"title\")";
        assert_eq!(extract_video_url(reply).as_deref(), Some("https://x/d.mp4"));
    }

    #[test]
    fn test_bare_url_heuristics() {
        assert_eq!(
            extract_video_url("Ready: https://cdn.example.com/out/e.mov.").as_deref(),
            Some("https://cdn.example.com/out/e.mov")
        );
        assert_eq!(
            extract_video_url(
                "see https://example.com/docs then https://cdn.example.com/videos/123"
            )
            .as_deref(),
            Some("https://cdn.example.com/videos/123")
        );
        assert_eq!(extract_video_url("see https://example.com/docs"), None);
    }

    #[test]
    fn test_extension_checked_before_query() {
        assert!(looks_like_video("https://x/a.mp4?sig=abc"));
        assert!(!looks_like_video("https://x/a.png?file=b.mp4"));
        assert!(!looks_like_video("https://video.example.com/"));
    }
}
