//! Content model and the collaborators that produce it.
//!
//! A resolved request yields a [`Content`]: either ordinary content or error
//! content. The pipeline only looks at the tag to pick the status code.
//!
//! - **`source`**: collaborator traits the pipeline calls through
//! - **`controllers`**: named controller/action registry
//! - **`files`**: static files under the server root
//! - **`error_page`**: HTML error pages
//! - **`pdf`**: nested HTTP round trip used for PDF rendering
//! - **`debug`**: the built-in request/session info page

pub mod controllers;
pub mod debug;
pub mod error;
pub mod error_page;
pub mod files;
pub mod pdf;
pub mod source;

use std::fmt;

use bytes::Bytes;

use crate::http::response::StatusCode;

pub use error::ContentError;
pub use source::ContentSources;

type RenderFn = Box<dyn FnOnce() -> Result<Bytes, ContentError> + Send>;

/// Body of a piece of content, either ready or produced on render.
pub enum Body {
    Ready(Bytes),
    Deferred(RenderFn),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Ready(bytes) => f.debug_tuple("Ready").field(&bytes.len()).finish(),
            Body::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

impl Body {
    fn render(self) -> Result<Bytes, ContentError> {
        match self {
            Body::Ready(bytes) => Ok(bytes),
            Body::Deferred(render) => render(),
        }
    }
}

#[derive(Debug)]
pub enum Content {
    Ok {
        content_type: String,
        body: Body,
    },
    Error {
        content_type: String,
        body: Body,
        intended: StatusCode,
    },
}

/// Rendered content, ready for framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: String,
    pub body: Bytes,
    pub is_error: bool,
}

impl Content {
    pub fn ok(content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Content::Ok {
            content_type: content_type.into(),
            body: Body::Ready(body.into()),
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        let body: String = body.into();
        Self::ok("text/plain", body)
    }

    pub fn html(body: impl Into<String>) -> Self {
        let body: String = body.into();
        Self::ok("text/html", body)
    }

    /// Content whose body is produced when the pipeline renders it.
    pub fn deferred<F>(content_type: impl Into<String>, render: F) -> Self
    where
        F: FnOnce() -> Result<Bytes, ContentError> + Send + 'static,
    {
        Content::Ok {
            content_type: content_type.into(),
            body: Body::Deferred(Box::new(render)),
        }
    }

    pub fn error(
        content_type: impl Into<String>,
        body: impl Into<Bytes>,
        intended: StatusCode,
    ) -> Self {
        Content::Error {
            content_type: content_type.into(),
            body: Body::Ready(body.into()),
            intended,
        }
    }

    pub fn content_type(&self) -> &str {
        match self {
            Content::Ok { content_type, .. } | Content::Error { content_type, .. } => content_type,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Content::Error { .. })
    }

    /// The status error content describes; `None` for ordinary content.
    pub fn intended_status(&self) -> Option<StatusCode> {
        match self {
            Content::Ok { .. } => None,
            Content::Error { intended, .. } => Some(*intended),
        }
    }

    pub fn render(self) -> Result<Rendered, ContentError> {
        let is_error = self.is_error();
        let (content_type, body) = match self {
            Content::Ok { content_type, body } | Content::Error { content_type, body, .. } => {
                (content_type, body)
            }
        };

        Ok(Rendered {
            content_type,
            body: body.render()?,
            is_error,
        })
    }
}
