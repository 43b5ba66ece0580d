//! MIME type detection based on file extensions.

use std::path::Path;

const DEFAULT: &str = "application/octet-stream";

/// Returns the content type for a file path, judged by its extension.
///
/// ```
/// # use sar::http::mime::from_path;
/// assert_eq!(from_path("site/index.HTML"), "text/html");
/// assert_eq!(from_path("blob"), "application/octet-stream");
/// ```
pub fn from_path(path: impl AsRef<Path>) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| from_extension(&ext.to_ascii_lowercase()))
        .unwrap_or(DEFAULT)
}

fn from_extension(ext: &str) -> &'static str {
    match ext {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "xml" => "text/xml",
        "csv" => "text/csv",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => DEFAULT,
    }
}
