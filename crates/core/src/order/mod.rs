//! Order module
//!
//! Booking model, admin list filters and the admin-driven order workflow.

mod filter;
mod model;
mod workflow;

pub use filter::OrderFilter;
pub use model::*;
pub use workflow::*;
