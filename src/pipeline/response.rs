use bytes::Bytes;

use crate::content::{Content, ContentError, ContentSources, Rendered};
use crate::http::request::Request;
use crate::http::response::{ResponseBuilder, StatusCode};
use crate::http::writer::serialize_response;
use crate::pipeline::resolver::{self, Source, DEBUG_ACTION, DEBUG_CONTROLLER};

/// Body sent when even the error page cannot be rendered.
const FALLBACK_BODY: &str = "500 SERVERERROR";

/// The answer to one request, fully serialized on construction.
///
/// Resolution, rendering and framing all happen inside [`HttpResponse::new`];
/// afterwards the response is read-only. Failures never escape: they are
/// turned into error content and sent with status 500, whatever status the
/// error page describes.
#[derive(Debug)]
pub struct HttpResponse {
    request: Request,
    content: Rendered,
    status: StatusCode,
    pdf_render: bool,
    bytes: Bytes,
}

impl HttpResponse {
    pub fn new(request: &Request, sources: &ContentSources) -> Self {
        let mut working = request.clone();
        let resolution = resolver::resolve(&mut working, sources.controllers.as_ref());
        let pdf_render = resolution.pdf_render;

        let (status, content) = match Self::produce(&working, resolution.source, sources) {
            Ok(content) if !content.is_error => (StatusCode::Ok, content),
            Ok(content) => (StatusCode::ServerError, content),
            Err(failure) => {
                let intended = failure.intended_status();
                tracing::warn!(
                    url = %working.full_url,
                    intended = intended.as_u16(),
                    error = %failure,
                    "Request failed"
                );
                let page = sources.errors.display(&working, &failure, intended);
                (StatusCode::ServerError, Self::render_error_page(page))
            }
        };

        let response = ResponseBuilder::new(status)
            .content_type(content.content_type.clone())
            .body(content.body.clone())
            .pdf_render(pdf_render)
            .build();
        let bytes = serialize_response(&response);

        tracing::debug!(
            url = %working.full_url,
            status = status.as_u16(),
            len = content.body.len(),
            pdf_render,
            "Response built"
        );

        Self {
            request: working,
            content,
            status,
            pdf_render,
            bytes,
        }
    }

    fn produce(
        request: &Request,
        source: Result<Source, ContentError>,
        sources: &ContentSources,
    ) -> Result<Rendered, ContentError> {
        let controllers = sources.controllers.as_ref();

        let content: Content = match source? {
            Source::Primary => controllers.request_primary(request)?,
            Source::RenderPdf { url } => sources.pdf.render_pdf(&url)?,
            Source::Debug => controllers.request_action(DEBUG_CONTROLLER, DEBUG_ACTION, request)?,
            Source::Action => controllers.request_path_action(request)?,
            Source::Static { path } => sources.files.read(&request.server, &path)?,
        };

        content.render()
    }

    fn render_error_page(page: Content) -> Rendered {
        match page.render() {
            Ok(rendered) => Rendered {
                is_error: true,
                ..rendered
            },
            Err(e) => {
                tracing::error!(error = %e, "Error page failed to render");
                Rendered {
                    content_type: "text/plain".to_string(),
                    body: Bytes::from_static(FALLBACK_BODY.as_bytes()),
                    is_error: true,
                }
            }
        }
    }

    /// The request as resolved, with any PDF-render suffix removed.
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn content(&self) -> &Rendered {
        &self.content
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn pdf_render(&self) -> bool {
        self.pdf_render
    }

    /// Serialized status line, headers and body.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}
