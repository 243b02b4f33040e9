//! Admin session context
//!
//! Holds the current bearer token and admin profile. Requests read the
//! token from here at send time.

mod context;
mod token;

pub use context::{AdminProfile, SessionContext};
pub use token::token_expiry;
