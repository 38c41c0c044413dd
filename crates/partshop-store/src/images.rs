//! Mocked image "upload": local files become `data:` URLs.
//!
//! The real deployment hands images to an upload service and gets a CDN
//! URL back. This stand-in inlines the bytes as a base64 data URL so the
//! rest of the system can treat image fields as opaque URLs either way.

use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fs;
use std::path::Path;

/// Encode a local image file as a `data:<mime>;base64,...` URL.
pub fn data_url(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let mime = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(mime_for)
        .unwrap_or("application/octet-stream");
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

fn mime_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
