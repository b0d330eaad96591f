//! Cache contract and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Which backend a cache is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    /// Bounded in-process table, private to one store.
    Local,
    /// Shared key/value service with per-entry TTL.
    Remote,
}

impl CacheKind {
    /// Whether other processes see the same entries.
    ///
    /// A write through a store with a private cache cannot evict what a
    /// running server already holds.
    pub fn is_shared(self) -> bool {
        matches!(self, Self::Remote)
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// Short key → URL cache sitting in front of the route table.
///
/// The cache is a disposable view of the database. Callers treat a failed
/// `get_url` as a miss and a failed write as non-fatal, so implementations may
/// report errors freely.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::BoundedLocalCache`] - In-process LRU table
/// - [`crate::infrastructure::cache::RedisCache`] - Redis with per-entry TTL
#[async_trait]
pub trait UrlCache: Send + Sync {
    /// Returns the cached URL, `Ok(None)` on a miss.
    async fn get_url(&self, short_key: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping, replacing any previous value.
    async fn set_url(&self, short_key: &str, url: &str) -> CacheResult<()>;

    /// Brings an entry up to date after its route changed.
    ///
    /// Defaults to an unconditional [`UrlCache::set_url`].
    async fn refresh_url(&self, short_key: &str, url: &str) -> CacheResult<()> {
        self.set_url(short_key, url).await
    }

    /// Drops a mapping; removing an absent key is not an error.
    async fn remove(&self, short_key: &str) -> CacheResult<()>;

    fn kind(&self) -> CacheKind;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
