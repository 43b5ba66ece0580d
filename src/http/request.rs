use std::collections::HashMap;
use std::path::PathBuf;

/// HTTP request methods.
///
/// Every method is parsed; content resolution does not depend on the method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH
}

/// The server a request arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// Port the listener is bound to; nested PDF requests go back to it.
    pub port: u16,
    /// Static content root.
    pub root: PathBuf,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            port: 80,
            root: PathBuf::from("."),
        }
    }
}

/// Represents a parsed HTTP request from a client.
///
/// `path` is the request target with the leading `/` and the query string
/// removed; it is the working copy the pipeline may shorten. `full_url` is
/// the request target exactly as received.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Resource path, e.g. `reports/daily` for `/reports/daily?x=1`
    pub path: String,
    /// Raw request target, e.g. `/reports/daily?x=1`
    pub full_url: String,
    /// HTTP version (typically "HTTP/1.0" or "HTTP/1.1")
    pub version: String,
    /// Request headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Request body for POST/PUT requests
    pub body: Vec<u8>,
    /// Originating server
    pub server: ServerInfo,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    server: ServerInfo,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive, typically uppercase)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string matches a known method, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use sar::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }
}

/// Derives the resource path from a request target.
///
/// ```
/// # use sar::http::request::path_from_target;
/// assert_eq!(path_from_target("/reports/daily?x=1"), "reports/daily");
/// assert_eq!(path_from_target("/"), "");
/// ```
pub fn path_from_target(target: &str) -> String {
    let without_query = target.split(['?', '#']).next().unwrap_or("");
    without_query.trim_start_matches('/').to_string()
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            target: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
            server: ServerInfo::default(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the raw request target; `path` is derived from it.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn server(mut self, server: ServerInfo) -> Self {
        self.server = server;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let full_url = self.target.ok_or("target missing")?;
        Ok(Request {
            method: self.method.unwrap_or(Method::GET),
            path: path_from_target(&full_url),
            full_url,
            version: self.version.unwrap_or_else(|| "HTTP/1.0".to_string()),
            headers: self.headers,
            body: self.body,
            server: self.server,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Looks up a cookie sent in the `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.header("Cookie")?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.trim())
    }

    /// The query string without its leading `?`, if any.
    pub fn query(&self) -> Option<&str> {
        self.full_url.split_once('?').map(|(_, q)| q)
    }
}
