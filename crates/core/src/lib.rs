//! Core library for the rental admin back-office
//!
//! This crate contains the client-side business logic, including:
//! - Order, payment and host models and the admin order workflow
//! - Catalog and content entities (cars, brands, packages, pages, templates)
//! - The admin session guard and session context
//! - The query cache used to keep admin listings fresh after writes
//! - Paged list results that keep the server's total count

pub mod cancellation;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod order;
pub mod paging;
pub mod query;
pub mod session;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
