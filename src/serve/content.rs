// src/serve/content.rs

use std::path::Path;

use crate::reload::client_script_tag;

pub const HTML: &str = "text/html; charset=utf-8";
pub const PLAIN: &str = "text/plain; charset=utf-8";

/// Content type by file extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => HTML,
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("txt") => PLAIN,
        _ => "application/octet-stream",
    }
}

/// Inject the reload client into HTML bodies when live reload is on.
pub fn maybe_inject_reload(body: Vec<u8>, content_type: &str, reload_port: Option<u16>) -> Vec<u8> {
    match (content_type.starts_with("text/html"), reload_port) {
        (true, Some(port)) => inject_before_body_end(&body, client_script_tag(port).as_bytes()),
        _ => body,
    }
}

/// Insert `snippet` before the last `</body>` (any case), or append it.
fn inject_before_body_end(content: &[u8], snippet: &[u8]) -> Vec<u8> {
    const PATTERN: &[u8] = b"</body>";

    let mut out = Vec::with_capacity(content.len() + snippet.len());
    match content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        Some(pos) => {
            out.extend_from_slice(&content[..pos]);
            out.extend_from_slice(snippet);
            out.extend_from_slice(&content[pos..]);
        }
        None => {
            out.extend_from_slice(content);
            out.extend_from_slice(snippet);
        }
    }
    out
}
