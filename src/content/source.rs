//! Collaborator contracts the response pipeline calls through.

use std::sync::Arc;

use crate::content::{Content, ContentError};
use crate::http::request::{Request, ServerInfo};
use crate::http::response::StatusCode;

/// Registry of named controllers and their actions.
pub trait ControllerRegistry: Send + Sync {
    /// Name of the primary controller, answering the empty path.
    fn primary(&self) -> Option<&str>;

    /// Name of the primary controller's action.
    fn primary_action(&self) -> Option<&str>;

    /// Whether the request path names a registered action.
    fn action_exists(&self, request: &Request) -> bool;

    fn request_primary(&self, request: &Request) -> Result<Content, ContentError>;

    fn request_action(
        &self,
        controller: &str,
        action: &str,
        request: &Request,
    ) -> Result<Content, ContentError>;

    /// Runs the action named by the request path.
    fn request_path_action(&self, request: &Request) -> Result<Content, ContentError>;
}

/// Static resources relative to a server root.
pub trait StaticSource: Send + Sync {
    /// Fails with [`ContentError::NotFound`] when the resource is absent.
    fn read(&self, server: &ServerInfo, path: &str) -> Result<Content, ContentError>;
}

pub trait ErrorRenderer: Send + Sync {
    /// Always returns error content tagged with `intended`.
    fn display(&self, request: &Request, failure: &ContentError, intended: StatusCode) -> Content;
}

/// Performs a nested request against `url` and returns its body.
pub trait PdfRenderer: Send + Sync {
    fn render_pdf(&self, url: &str) -> Result<Content, ContentError>;
}

/// The set of collaborators one server hands to every pipeline.
#[derive(Clone)]
pub struct ContentSources {
    pub controllers: Arc<dyn ControllerRegistry>,
    pub files: Arc<dyn StaticSource>,
    pub errors: Arc<dyn ErrorRenderer>,
    pub pdf: Arc<dyn PdfRenderer>,
}

impl ContentSources {
    pub fn new(
        controllers: Arc<dyn ControllerRegistry>,
        files: Arc<dyn StaticSource>,
        errors: Arc<dyn ErrorRenderer>,
        pdf: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self {
            controllers,
            files,
            errors,
            pdf,
        }
    }
}
