//! REST endpoint wrappers
//!
//! Each wrapper pairs one backend route with typed request and response
//! bodies. They are inherent methods on [`crate::ApiClient`].

mod auth;
mod cancellation;
mod catalog;
mod content;
mod dashboard;
mod health;
mod orders;
mod settings;
mod upload;

pub use auth::LoginOutcome;

/// Percent-encode a single path segment
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

