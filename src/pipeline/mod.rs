//! Per-request response pipeline.
//!
//! ```text
//!   request ──► strip -pdf-render ──► resolver::select ──► content source
//!                                                              │
//!                      ┌──────── failure ◄─────────────────────┤
//!                      ▼                                       ▼ content
//!               error renderer ──► 500                  render ──► 200
//!                                                   (error content ──► 500)
//! ```

pub mod resolver;
pub mod response;

pub use resolver::{Resolution, Source, PDF_RENDER, PDF_REQUEST};
pub use response::HttpResponse;
