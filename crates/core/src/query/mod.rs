//! Query cache
//!
//! Bounded keyed cache of fetched listings with prefix invalidation after
//! writes.

mod cache;
mod key;

pub use cache::{CacheEntry, QueryCache, DEFAULT_CAPACITY};
pub use key::QueryKey;
