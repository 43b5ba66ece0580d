//! Per-visitor session state.
//!
//! Sessions are keyed by a random UUID and expire two days after their last
//! request. Expired sessions stay retrievable until
//! [`SessionStore::remove_expired`] drops them; the server runs it hourly.

pub mod store;

pub use store::{Session, SessionStore, Value, MAX_LIFE};
