#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use sar::content::controllers::ActionRegistry;
use sar::content::error_page::ErrorPage;
use sar::content::source::{PdfRenderer, StaticSource};
use sar::content::{Content, ContentError, ContentSources};
use sar::http::request::{Request, RequestBuilder, ServerInfo};

pub const PORT: u16 = 8080;

pub fn server() -> ServerInfo {
    ServerInfo {
        port: PORT,
        root: PathBuf::from("www"),
    }
}

pub fn request(target: &str) -> Request {
    RequestBuilder::new()
        .target(target)
        .server(server())
        .build()
        .unwrap()
}

/// Static source backed by a map of path → (content type, body).
#[derive(Default)]
pub struct StubFiles {
    files: HashMap<String, (String, Vec<u8>)>,
    pub reads: Mutex<Vec<String>>,
}

impl StubFiles {
    pub fn with(mut self, path: &str, content_type: &str, body: &[u8]) -> Self {
        self.files
            .insert(path.to_string(), (content_type.to_string(), body.to_vec()));
        self
    }
}

impl StaticSource for StubFiles {
    fn read(&self, _server: &ServerInfo, path: &str) -> Result<Content, ContentError> {
        self.reads.lock().unwrap().push(path.to_string());
        match self.files.get(path) {
            Some((content_type, body)) => Ok(Content::ok(content_type.clone(), body.clone())),
            None => Err(ContentError::NotFound(path.to_string())),
        }
    }
}

/// PDF renderer that records the URLs it was asked for.
pub struct RecordingPdf {
    pub urls: Mutex<Vec<String>>,
    body: Vec<u8>,
}

impl RecordingPdf {
    pub fn new(body: &[u8]) -> Self {
        Self {
            urls: Mutex::new(Vec::new()),
            body: body.to_vec(),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl PdfRenderer for RecordingPdf {
    fn render_pdf(&self, url: &str) -> Result<Content, ContentError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(Content::ok("application/pdf", self.body.clone()))
    }
}

pub struct Fixture {
    pub sources: ContentSources,
    pub files: Arc<StubFiles>,
    pub pdf: Arc<RecordingPdf>,
}

pub fn fixture(controllers: ActionRegistry, files: StubFiles) -> Fixture {
    let files = Arc::new(files);
    let pdf = Arc::new(RecordingPdf::new(b"%PDF-1.4 stub"));
    let sources = ContentSources::new(
        Arc::new(controllers),
        files.clone(),
        Arc::new(ErrorPage),
        pdf.clone(),
    );
    Fixture { sources, files, pdf }
}

/// Splits serialized response bytes into header text and body.
pub fn split_response(bytes: &[u8]) -> (String, Vec<u8>) {
    let end = bytes
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header terminator");
    (
        String::from_utf8(bytes[..end].to_vec()).unwrap(),
        bytes[end + 4..].to_vec(),
    )
}
