//! Admin route guard
//!
//! Decides whether an admin route renders, redirects, or waits for the
//! session lookup to settle.

mod route;
mod state;

pub use route::{Redirect, RouteKind, DASHBOARD_ROUTE, LOGIN_ROUTE};
pub use state::{AdminGuard, GuardState, UnauthenticatedCause, FORCE_LOGOUT_AFTER};
