//! Nested HTTP round trip used to render `-pdf` paths.
//!
//! The renderer asks this server (or any server named by the URL) for the
//! page and returns the response body as content. It runs synchronously on
//! the calling thread; every phase is bounded by the configured timeout.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::content::source::PdfRenderer;
use crate::content::{Content, ContentError};

const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

/// Upstream responses larger than this are refused.
const MAX_RESPONSE: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct HttpPdfRenderer {
    timeout: Duration,
}

impl HttpPdfRenderer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn fetch(&self, url: &str) -> Result<Content> {
        let url = Url::parse(url).context("Invalid PDF render URL")?;
        let host = url.host_str().context("PDF render URL missing host")?;
        let port = url.port_or_known_default().unwrap_or(80);

        let mut stream = self.connect(host, port)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let request = format!(
            "GET {} HTTP/1.0\r\nHost: {}:{}\r\nConnection: close\r\n\r\n",
            target, host, port
        );
        stream.write_all(request.as_bytes())?;
        stream.flush()?;

        tracing::trace!(url = %url, "PDF render request sent");

        let mut raw = Vec::new();
        (&mut stream)
            .take(MAX_RESPONSE)
            .read_to_end(&mut raw)
            .context("Reading PDF render response")?;

        parse_upstream(&raw)
    }

    /// `localhost` may resolve to several addresses; the first that accepts wins.
    fn connect(&self, host: &str, port: u16) -> Result<TcpStream> {
        let mut last_error = None;
        for addr in (host, port)
            .to_socket_addrs()
            .context("Resolving PDF render host")?
        {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }

        match last_error {
            Some(e) => Err(e).context("Failed to connect for PDF render"),
            None => anyhow::bail!("PDF render host {} has no address", host),
        }
    }
}

impl PdfRenderer for HttpPdfRenderer {
    fn render_pdf(&self, url: &str) -> Result<Content, ContentError> {
        tracing::debug!(url, "Rendering PDF through nested request");
        self.fetch(url)
            .map_err(|e| ContentError::Render(format!("{:#}", e)))
    }
}

/// Splits a raw upstream response into content, keeping its content type.
fn parse_upstream(raw: &[u8]) -> Result<Content> {
    let headers_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .context("Incomplete PDF render response")?;

    let head = std::str::from_utf8(&raw[..headers_end])
        .context("Invalid UTF-8 in PDF render headers")?;
    let mut lines = head.split("\r\n");

    let status_line = lines.next().context("Empty PDF render response")?;
    let code: u16 = status_line
        .split_whitespace()
        .nth(1)
        .context("Invalid status line")?
        .parse()
        .context("Invalid status code")?;

    if code != 200 {
        anyhow::bail!("PDF render returned status {}", code);
    }

    let mut content_type = DEFAULT_CONTENT_TYPE.to_string();
    let mut content_length = None;
    for line in lines {
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim();
            if key.trim().eq_ignore_ascii_case("Content-Type") {
                content_type = value.to_string();
            } else if key.trim().eq_ignore_ascii_case("Content-Length") {
                content_length = value.parse::<usize>().ok();
            }
        }
    }

    let mut body = &raw[headers_end + 4..];
    if let Some(len) = content_length {
        if body.len() < len {
            anyhow::bail!("Connection closed before complete body received");
        }
        body = &body[..len];
    }

    Ok(Content::ok(content_type, body.to_vec()))
}
