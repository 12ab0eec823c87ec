//! In-memory caches for quotes and history.

mod cache;
mod key;

pub use cache::{CacheStore, Lookup};
pub use key::CacheKey;
