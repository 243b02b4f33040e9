//! Rental admin API client
//!
//! This crate talks to the rental backend on behalf of the admin
//! back-office:
//! - Transport abstraction with a reqwest implementation
//! - Bearer injection from the session and single-flight token refresh
//! - Typed wrappers for every admin REST endpoint
//! - Admin service pairing queries with cache keys and invalidation

mod admin;
mod client;
mod config;
pub mod endpoints;
mod error;
mod refresh;
mod transport;

#[cfg(test)]
mod testing;

pub use admin::{AdminService, PendingActions};
pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::{ClientError, Result, GENERIC_ERROR_MESSAGE};
pub use refresh::{RefreshCoordinator, DEFAULT_REFRESH_PATH};
pub use transport::{
    ApiRequest, ApiResponse, FilePart, Method, ReqwestTransport, RequestBody, Transport,
};
