//! Redis-backed cache implementation.

use super::service::{CacheError, CacheKind, CacheResult, UrlCache};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

const KEY_PREFIX: &str = "golink:";

/// Shared remote cache with a per-entry TTL.
///
/// Uses `ConnectionManager` for connection reuse and transparent reconnects.
/// Errors are returned to the store, which logs them and degrades to the
/// database.
pub struct RedisCache {
    client: ConnectionManager,
    ttl: Duration,
}

impl RedisCache {
    /// Wraps an already-connected manager; every `set_url` applies `ttl`.
    pub fn new(client: ConnectionManager, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, ttl: Duration) -> CacheResult<Self> {
        let manager = connect_manager(redis_url).await?;
        Ok(Self::new(manager, ttl))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Opens a `ConnectionManager` and checks it with a PING.
pub async fn connect_manager(redis_url: &str) -> CacheResult<ConnectionManager> {
    info!("Connecting to Redis at {}", redis_url);

    let client = Client::open(redis_url).map_err(|e| {
        CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
    })?;

    let manager = ConnectionManager::new(client).await.map_err(|e| {
        CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
    })?;

    let mut test_conn = manager.clone();
    test_conn
        .ping::<()>()
        .await
        .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

    info!("✓ Connected to Redis");
    Ok(manager)
}

/// Namespaced Redis key for a short key.
fn build_key(short_key: &str) -> String {
    format!("{}{}", KEY_PREFIX, short_key)
}

#[async_trait]
impl UrlCache for RedisCache {
    async fn get_url(&self, short_key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        let url = conn
            .get::<_, Option<String>>(build_key(short_key))
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", short_key, e)))?;

        match &url {
            Some(url) => debug!("Cache HIT: {} -> {}", short_key, url),
            None => debug!("Cache MISS: {}", short_key),
        }
        Ok(url)
    }

    async fn set_url(&self, short_key: &str, url: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let ttl_seconds = self.ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(build_key(short_key), url, ttl_seconds)
            .await
            .map_err(|e| CacheError::OperationError(format!("SET {}: {}", short_key, e)))?;

        debug!(
            "Cache SET: {} -> {} (TTL: {}s)",
            short_key, url, ttl_seconds
        );
        Ok(())
    }

    async fn remove(&self, short_key: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();

        let deleted = conn
            .del::<_, i32>(build_key(short_key))
            .await
            .map_err(|e| CacheError::OperationError(format!("DEL {}: {}", short_key, e)))?;

        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", short_key);
        }
        Ok(())
    }

    fn kind(&self) -> CacheKind {
        CacheKind::Remote
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
