use crate::content::source::ErrorRenderer;
use crate::content::{Content, ContentError};
use crate::http::request::Request;
use crate::http::response::StatusCode;

/// Renders failures as a small HTML page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorPage;

impl ErrorRenderer for ErrorPage {
    fn display(&self, request: &Request, failure: &ContentError, intended: StatusCode) -> Content {
        let title = format!("{} {}", intended.as_u16(), intended.reason_phrase());
        let page = format!(
            "<!DOCTYPE html>\n<html>\n<head><title>{title}</title></head>\n<body>\n\
             <h1>{title}</h1>\n<p>{message}</p>\n<p><code>{url}</code></p>\n</body>\n</html>\n",
            title = title,
            message = escape(&failure.to_string()),
            url = escape(&request.full_url),
        );

        Content::error("text/html", page, intended)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
