//! Content resolution: which source answers a request path.
//!
//! Checked in order:
//!
//! 1. a trailing [`PDF_RENDER`] suffix is stripped and PDF-render mode set,
//! 2. the empty path goes to the primary controller,
//! 3. a trailing [`PDF_REQUEST`] goes through the PDF renderer,
//! 4. `info` goes to the debug action,
//! 5. a registered action path goes to that action,
//! 6. anything else is a static resource.
//!
//! Suffix and name checks ignore ASCII case.

use crate::content::source::ControllerRegistry;
use crate::content::ContentError;
use crate::http::request::Request;

/// Suffix marking the inner leg of a PDF render.
pub const PDF_RENDER: &str = "-pdf-render";

/// Suffix asking for a page rendered as PDF.
pub const PDF_REQUEST: &str = "-pdf";

pub const DEBUG_CONTROLLER: &str = "Debug";
pub const DEBUG_ACTION: &str = "Info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Primary,
    /// Nested request against `url`.
    RenderPdf { url: String },
    Debug,
    Action,
    Static { path: String },
}

/// Outcome of resolving one request. The PDF-render flag is known even when
/// no source could be selected.
#[derive(Debug)]
pub struct Resolution {
    pub source: Result<Source, ContentError>,
    pub pdf_render: bool,
}

/// Strips [`PDF_RENDER`] from the working path, reporting whether it was there.
pub fn strip_pdf_render(path: &mut String) -> bool {
    if ends_with_ignore_case(path, PDF_RENDER) {
        path.truncate(path.len() - PDF_RENDER.len());
        true
    } else {
        false
    }
}

/// Picks the source for an already-stripped request path.
pub fn select(request: &Request, controllers: &dyn ControllerRegistry) -> Result<Source, ContentError> {
    let path = request.path.as_str();

    if path.is_empty() {
        if controllers.primary().is_none() {
            return Err(ContentError::Configuration("Primary Controller Not Defined".into()));
        }
        if controllers.primary_action().is_none() {
            return Err(ContentError::Configuration("Primary Action Not Defined".into()));
        }
        return Ok(Source::Primary);
    }

    if ends_with_ignore_case(path, PDF_REQUEST) {
        return Ok(Source::RenderPdf {
            url: nested_pdf_url(request),
        });
    }

    if path.eq_ignore_ascii_case("info") {
        return Ok(Source::Debug);
    }

    if controllers.action_exists(request) {
        return Ok(Source::Action);
    }

    Ok(Source::Static {
        path: path.to_string(),
    })
}

/// Strips the PDF-render suffix from the request's working path, then
/// selects a source for what remains.
pub fn resolve(request: &mut Request, controllers: &dyn ControllerRegistry) -> Resolution {
    let pdf_render = strip_pdf_render(&mut request.path);
    let source = select(request, controllers);
    Resolution { source, pdf_render }
}

/// Localhost URL repeating the request with `-pdf` swapped for `-pdf-render`.
///
/// The nested request resolves through the PDF-render suffix, so it cannot
/// come back here for the same path.
pub fn nested_pdf_url(request: &Request) -> String {
    let path = &request.path;
    let stem = if ends_with_ignore_case(path, PDF_REQUEST) {
        &path[..path.len() - PDF_REQUEST.len()]
    } else {
        path.as_str()
    };

    let mut url = format!(
        "http://localhost:{}/{}{}",
        request.server.port, stem, PDF_RENDER
    );
    if let Some(query) = request.query() {
        url.push('?');
        url.push_str(query);
    }
    url
}

fn ends_with_ignore_case(text: &str, suffix: &str) -> bool {
    text.len() >= suffix.len()
        && text.as_bytes()[text.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}
