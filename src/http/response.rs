use bytes::Bytes;

/// Value of the `Server` header: `sar\<crate version>`.
pub const SERVER_NAME: &str = concat!("sar\\", env!("CARGO_PKG_VERSION"));

/// HTTP status codes emitted by the server.
///
/// Reason phrases are the upper-case names clients of this server already
/// match on (`500 SERVERERROR`), not the RFC phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 302 FOUND, reserved for redirects
    Found,
    /// 404 NOTFOUND
    NotFound,
    /// 500 SERVERERROR
    ServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use sar::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Found => 302,
            StatusCode::NotFound => 404,
            StatusCode::ServerError => 500,
        }
    }

    /// Returns the reason phrase written on the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use sar::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::ServerError.reason_phrase(), "SERVERERROR");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Found => "FOUND",
            StatusCode::NotFound => "NOTFOUND",
            StatusCode::ServerError => "SERVERERROR",
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            302 => Some(StatusCode::Found),
            404 => Some(StatusCode::NotFound),
            500 => Some(StatusCode::ServerError),
            _ => None,
        }
    }
}

/// A complete HTTP response ready to be serialized.
///
/// Headers keep insertion order; the writer emits them as stored.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Builds the fixed header block every response carries.
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("text/html")
///     .body(page)
///     .pdf_render(true)
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: String,
    body: Bytes,
    pdf_render: bool,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: "text/plain".to_string(),
            body: Bytes::new(),
            pdf_render: false,
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Marks the response as the inner leg of a PDF render.
    pub fn pdf_render(mut self, pdf_render: bool) -> Self {
        self.pdf_render = pdf_render;
        self
    }

    /// Header order is fixed: content framing, server, CORS, the optional
    /// PDF marker, then `Connection: close`.
    pub fn build(self) -> Response {
        let mut headers = vec![
            ("Content-Type".to_string(), self.content_type),
            ("Content-Length".to_string(), self.body.len().to_string()),
            ("Server".to_string(), SERVER_NAME.to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
            ("Access-Control-Allow-Methods".to_string(), "POST, GET".to_string()),
            ("Access-Control-Max-Age".to_string(), "1728000".to_string()),
            ("Access-Control-Allow-Credentials".to_string(), "true".to_string()),
        ];

        if self.pdf_render {
            headers.push(("X-Content-Type-Options".to_string(), "pdf-render".to_string()));
        }

        headers.push(("Connection".to_string(), "close".to_string()));

        Response {
            status: self.status,
            headers,
            body: self.body,
        }
    }
}
