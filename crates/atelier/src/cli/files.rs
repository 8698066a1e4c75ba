//! Reading attachments from disk.

use atelier::{AtelierResult, Attachment, RequestError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => return None,
    };
    Some(mime)
}

/// Load a file as a base64 attachment, typed by its extension.
pub fn load_attachment(path: &Path) -> AtelierResult<Attachment> {
    let mime = mime_for(path).ok_or_else(|| {
        RequestError::new(format!("unsupported attachment type: {}", path.display()))
    })?;
    let bytes = std::fs::read(path)
        .map_err(|e| RequestError::new(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(Attachment::new(mime, STANDARD.encode(bytes)))
}
