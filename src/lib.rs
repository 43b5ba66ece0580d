//! sar - small HTTP/1.0 application server
//!
//! Resolves each request to a content source, frames the rendered content
//! as an HTTP/1.0 response, and keeps per-visitor sessions.

pub mod config;
pub mod content;
pub mod http;
pub mod pipeline;
pub mod server;
pub mod session;
