//! URL caches fronting the route table.
//!
//! Provides a [`UrlCache`] trait with two implementations, exactly one of which
//! backs a given store:
//! - [`BoundedLocalCache`] - In-process LRU table for single-node deployments
//! - [`RedisCache`] - Shared Redis cache with per-entry TTL

mod local_cache;
mod redis_cache;
mod service;

pub use local_cache::{BoundedLocalCache, DEFAULT_LOCAL_CAPACITY};
pub use redis_cache::{RedisCache, connect_manager};
pub use service::{CacheError, CacheKind, CacheResult, UrlCache};
