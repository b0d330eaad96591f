#![allow(dead_code)]

use async_trait::async_trait;
use golinks::domain::entities::Route;
use golinks::infrastructure::cache::{CacheError, CacheKind, CacheResult, UrlCache};
use golinks::infrastructure::persistence::{Dialect, run_migrations};
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use std::collections::HashMap;
use std::sync::Mutex;

/// Fresh in-memory SQLite database with the schema applied.
///
/// A single connection that never idles out, so the database lives as long
/// as the pool.
pub async fn sqlite_pool() -> AnyPool {
    sqlx::any::install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    run_migrations(Dialect::Sqlite, &pool).await.unwrap();
    pool
}

pub fn test_route(key: &str, url: &str, creator: &str) -> Route {
    Route::new(key, url, creator, None).unwrap()
}

/// Removes a route behind the store's back, so only the cache still knows it.
pub async fn delete_row(pool: &AnyPool, key: &str) {
    sqlx::query("DELETE FROM routes WHERE short_key = ?")
        .bind(key)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn stored_url(pool: &AnyPool, key: &str) -> Option<String> {
    sqlx::query_scalar("SELECT url FROM routes WHERE short_key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .unwrap()
}

pub async fn user_count(pool: &AnyPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Remote-style cache that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
    failing: bool,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, op: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(&format!("{op}:")))
            .count()
    }

    pub fn cached(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn record(&self, op: &str, key: &str) -> CacheResult<()> {
        self.calls.lock().unwrap().push(format!("{op}:{key}"));
        if self.failing {
            Err(CacheError::ConnectionError("cache unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UrlCache for RecordingCache {
    async fn get_url(&self, short_key: &str) -> CacheResult<Option<String>> {
        self.record("get", short_key)?;
        Ok(self.cached(short_key))
    }

    async fn set_url(&self, short_key: &str, url: &str) -> CacheResult<()> {
        self.record("set", short_key)?;
        self.entries
            .lock()
            .unwrap()
            .insert(short_key.to_string(), url.to_string());
        Ok(())
    }

    async fn remove(&self, short_key: &str) -> CacheResult<()> {
        self.record("remove", short_key)?;
        self.entries.lock().unwrap().remove(short_key);
        Ok(())
    }

    fn kind(&self) -> CacheKind {
        CacheKind::Remote
    }

    async fn health_check(&self) -> bool {
        !self.failing
    }
}
