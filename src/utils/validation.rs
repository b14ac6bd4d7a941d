use mime::Mime;
use std::path::Path;

/// MIME types accepted for upload. Anything else is rejected before any
/// bytes are persisted.
pub const ALLOWED_UPLOAD_MIME_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Maximum length of the display filename echoed back to the client.
const MAX_DISPLAY_FILENAME_LEN: usize = 64;

/// Checks a declared content type against the upload allowlist.
///
/// Returns the canonical file extension for the type, or `None` if the type
/// is not allowed. Parameters (`; charset=...`) and case are normalized via
/// the `mime` parser, so `IMAGE/PNG; foo=bar` still matches.
pub fn allowed_upload_extension(content_type: &str) -> Option<&'static str> {
    let mime: Mime = content_type.trim().parse().ok()?;
    match mime.essence_str().to_ascii_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpeg"),
        _ => None,
    }
}

/// Reduces a client-supplied filename to something safe to echo back as
/// display metadata. The result is never used to build a storage path.
pub fn sanitize_display_filename(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .take(MAX_DISPLAY_FILENAME_LEN)
        .collect();

    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
