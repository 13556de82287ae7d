//! URL-keyed disk cache for API responses
//!
//! This module provides a cache that maps a URL deterministically to a file
//! path under a cache root and reads/writes raw response bodies there. There
//! is no TTL and no eviction: an entry lives until the next write to the same
//! key overwrites it.

mod store;

pub use store::{CacheError, DiskCache};
