use thiserror::Error;

use crate::http::response::StatusCode;

/// Failures raised while resolving or rendering content.
///
/// None of these reach the client as-is: the pipeline hands them to the
/// error renderer and always answers with a complete response.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Server is missing a required registration, e.g. no primary controller.
    #[error("{0}")]
    Configuration(String),

    /// Requested static resource or action does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Any other failure while producing the body.
    #[error("render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ContentError {
    pub fn render(msg: impl Into<String>) -> Self {
        ContentError::Render(msg.into())
    }

    /// The status the error page should describe.
    ///
    /// Missing resources describe 404; everything else describes 500.
    pub fn intended_status(&self) -> StatusCode {
        match self {
            ContentError::NotFound(_) => StatusCode::NotFound,
            ContentError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NotFound,
            _ => StatusCode::ServerError,
        }
    }
}
