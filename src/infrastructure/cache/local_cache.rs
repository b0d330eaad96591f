//! In-process bounded cache.

use super::service::{CacheKind, CacheResult, UrlCache};
use async_trait::async_trait;
use moka::future::Cache;
use moka::ops::compute::Op;
use moka::policy::EvictionPolicy;
use tracing::{debug, trace};

/// Default number of entries kept by [`BoundedLocalCache`].
pub const DEFAULT_LOCAL_CAPACITY: u64 = 500;

/// Fixed-capacity LRU table of short key → URL.
///
/// Entries never expire on their own; they leave on eviction or explicit
/// removal. Only suitable when one process owns the database writes, otherwise
/// peers would serve stale URLs.
///
/// Even within one process a fill can go stale: a read that misses, loads the
/// old URL, and then inserts it after a concurrent modify has already run
/// [`UrlCache::refresh_url`] (a no-op for an absent key) leaves the old URL
/// cached until the next modify, delete or eviction.
#[derive(Debug, Clone)]
pub struct BoundedLocalCache {
    cache: Cache<String, String>,
    capacity: u64,
}

impl BoundedLocalCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOCAL_CAPACITY)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        debug!("Using local LRU cache (capacity: {})", capacity);
        let cache = Cache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { cache, capacity }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Approximate number of entries; exact after [`Self::run_pending_tasks`].
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn contains(&self, short_key: &str) -> bool {
        self.cache.contains_key(short_key)
    }

    /// Applies pending evictions and access-order updates.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for BoundedLocalCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for BoundedLocalCache {
    async fn get_url(&self, short_key: &str) -> CacheResult<Option<String>> {
        let url = self.cache.get(short_key).await;
        trace!(short_key, hit = url.is_some(), "Local cache lookup");
        Ok(url)
    }

    async fn set_url(&self, short_key: &str, url: &str) -> CacheResult<()> {
        self.cache.insert(short_key.to_string(), url.to_string()).await;
        debug!("Local cache SET: {} -> {}", short_key, url);
        Ok(())
    }

    /// Overwrites the entry only if it is currently cached; an absent key
    /// stays absent and is loaded on the next read.
    async fn refresh_url(&self, short_key: &str, url: &str) -> CacheResult<()> {
        let url = url.to_string();
        self.cache
            .entry_by_ref(short_key)
            .and_compute_with(|entry| {
                let op = match entry {
                    Some(_) => Op::Put(url),
                    None => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
        Ok(())
    }

    async fn remove(&self, short_key: &str) -> CacheResult<()> {
        self.cache.invalidate(short_key).await;
        debug!("Local cache INVALIDATE: {}", short_key);
        Ok(())
    }

    fn kind(&self) -> CacheKind {
        CacheKind::Local
    }

    async fn health_check(&self) -> bool {
        true
    }
}
