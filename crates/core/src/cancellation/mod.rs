//! Cancellation reasons curated by admins and picked when cancelling an order.

mod model;

pub use model::*;
