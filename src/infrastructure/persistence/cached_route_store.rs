//! Cache-aside route store over SQLite or MySQL.

use async_trait::async_trait;
use metrics::counter;
use redis::aio::ConnectionManager;
use sqlx::{AnyPool, Row, any::AnyRow};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::db_error::is_duplicate_constraint;
use super::dialect::{Dialect, Query, require_sql};
use super::sql_user_directory::SqlUserDirectory;
use crate::domain::entities::route::{format_timestamp, now, parse_timestamp};
use crate::domain::entities::{Route, User};
use crate::domain::repositories::{RouteStore, StoreHealth, UserDirectory};
use crate::error::{StoreError, StoreResult};
use crate::infrastructure::cache::{
    BoundedLocalCache, CacheKind, CacheResult, DEFAULT_LOCAL_CAPACITY, RedisCache, UrlCache,
};

/// Construction parameters for [`CachedRouteStore`].
///
/// The remote cache is used only when a client is supplied **and** the TTL is
/// positive; a TTL of `-1` (the default) selects the bounded local cache.
#[derive(Clone)]
pub struct StoreOptions {
    pub dialect: Dialect,
    pub remote_cache: Option<ConnectionManager>,
    pub cache_ttl_seconds: i64,
    pub local_cache_capacity: u64,
}

impl StoreOptions {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            remote_cache: None,
            cache_ttl_seconds: -1,
            local_cache_capacity: DEFAULT_LOCAL_CAPACITY,
        }
    }

    pub fn with_remote_cache(mut self, client: ConnectionManager, ttl_seconds: i64) -> Self {
        self.remote_cache = Some(client);
        self.cache_ttl_seconds = ttl_seconds;
        self
    }

    pub fn with_local_capacity(mut self, capacity: u64) -> Self {
        self.local_cache_capacity = capacity;
        self
    }

    fn uses_remote(&self) -> bool {
        self.remote_cache.is_some() && self.cache_ttl_seconds > 0
    }

    /// The effective configuration these options produce.
    pub fn settings(&self) -> StoreSettings {
        if self.uses_remote() {
            StoreSettings {
                dialect: self.dialect,
                cache: CacheKind::Remote,
                cache_ttl_seconds: Some(self.cache_ttl_seconds.unsigned_abs()),
                local_cache_capacity: None,
            }
        } else {
            StoreSettings {
                dialect: self.dialect,
                cache: CacheKind::Local,
                cache_ttl_seconds: None,
                local_cache_capacity: Some(self.local_cache_capacity),
            }
        }
    }

    fn build_cache(self) -> Arc<dyn UrlCache> {
        let ttl = Duration::from_secs(self.cache_ttl_seconds.unsigned_abs());
        match self.remote_cache {
            Some(client) if self.cache_ttl_seconds > 0 => {
                info!("Route cache: Redis (TTL: {}s)", ttl.as_secs());
                Arc::new(RedisCache::new(client, ttl))
            }
            remote => {
                if remote.is_some() {
                    warn!(
                        "Redis client supplied with TTL {}; using local cache instead",
                        self.cache_ttl_seconds
                    );
                }
                info!(
                    "Route cache: local LRU (capacity: {})",
                    self.local_cache_capacity
                );
                Arc::new(BoundedLocalCache::with_capacity(self.local_cache_capacity))
            }
        }
    }
}

/// Comparable summary of a store's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    pub dialect: Dialect,
    pub cache: CacheKind,
    pub cache_ttl_seconds: Option<u64>,
    pub local_cache_capacity: Option<u64>,
}

/// Route store that resolves URLs through a cache before the database.
///
/// The database is the system of record; the cache only holds short key → URL
/// pairs and may be lost at any time. Each operation is atomic per statement
/// and per cache mutation, never across the two, so a reader may briefly see a
/// cached URL for a row deleted by another store sharing the remote cache.
pub struct CachedRouteStore {
    dialect: Dialect,
    pool: AnyPool,
    users: SqlUserDirectory,
    cache: Arc<dyn UrlCache>,
    settings: StoreSettings,
}

impl CachedRouteStore {
    pub fn new(pool: AnyPool, options: StoreOptions) -> Self {
        let dialect = options.dialect;
        let settings = options.settings();
        let cache = options.build_cache();
        Self {
            dialect,
            users: SqlUserDirectory::new(dialect, pool.clone()),
            pool,
            cache,
            settings,
        }
    }

    /// Builds a store around a caller-provided cache backend.
    pub fn with_cache(dialect: Dialect, pool: AnyPool, cache: Arc<dyn UrlCache>) -> Self {
        let settings = StoreSettings {
            dialect,
            cache: cache.kind(),
            cache_ttl_seconds: None,
            local_cache_capacity: None,
        };
        Self {
            dialect,
            users: SqlUserDirectory::new(dialect, pool.clone()),
            pool,
            cache,
            settings,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn settings(&self) -> StoreSettings {
        self.settings
    }

    pub fn cache_kind(&self) -> CacheKind {
        self.cache.kind()
    }

    pub fn users(&self) -> &SqlUserDirectory {
        &self.users
    }

    /// Resolves `principal`, reusing `known` when it names the same user.
    async fn resolve_user(&self, principal: &str, known: &User) -> StoreResult<User> {
        if principal == known.name {
            Ok(known.clone())
        } else {
            self.users.get_or_create(principal).await
        }
    }

    /// Cache writes follow a successful database write and must not fail it.
    fn note_cache_write(&self, short_key: &str, outcome: CacheResult<()>) {
        if let Err(e) = outcome {
            counter!("golinks_cache_write_errors_total", "backend" => self.cache.kind().to_string())
                .increment(1);
            warn!("Cache update failed for {}: {}", short_key, e);
        }
    }
}

fn route_from_row(row: &AnyRow) -> StoreResult<Route> {
    let timestamp = |column: &str| -> StoreResult<_> {
        let raw: String = row.try_get(column)?;
        parse_timestamp(&raw).ok_or_else(|| {
            StoreError::Storage(sqlx::Error::Decode(
                format!("unparseable {column} '{raw}'").into(),
            ))
        })
    };

    Ok(Route {
        short_key: row.try_get("short_key")?,
        url: row.try_get("url")?,
        creator: row.try_get("creator")?,
        team: row.try_get("team")?,
        created_at: timestamp("created_at")?,
        modified_at: timestamp("modified_at")?,
        last_modified_by: row.try_get("last_modified_by")?,
        locked: row.try_get::<i64, _>("locked")? != 0,
    })
}

#[async_trait]
impl RouteStore for CachedRouteStore {
    async fn add(&self, route: Route) -> StoreResult<u64> {
        route.check()?;

        let creator = self.users.get_or_create(&route.creator).await?;
        let team = self.resolve_user(&route.team, &creator).await?;
        let modifier = self.resolve_user(&route.last_modified_by, &creator).await?;

        let sql = require_sql(self.dialect, Query::InsertRoute)?;
        let result = sqlx::query(sql)
            .bind(&route.short_key)
            .bind(&route.url)
            .bind(creator.id)
            .bind(team.id)
            .bind(format_timestamp(&route.created_at))
            .bind(format_timestamp(&route.modified_at))
            .bind(modifier.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_duplicate_constraint(self.dialect, &e) {
                    StoreError::DuplicateKey(route.short_key.clone())
                } else {
                    StoreError::Storage(e)
                }
            })?;

        info!("Added route {} -> {} by {}", route.short_key, route.url, creator.name);
        Ok(result.rows_affected())
    }

    async fn get(&self, short_key: &str) -> StoreResult<Route> {
        let sql = require_sql(self.dialect, Query::GetRouteByKey)?;
        let row = sqlx::query(sql)
            .bind(short_key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => route_from_row(&row),
            None => Err(StoreError::NotFound(short_key.to_string())),
        }
    }

    async fn get_url(&self, short_key: &str) -> StoreResult<String> {
        let backend = self.cache.kind().to_string();
        match self.cache.get_url(short_key).await {
            Ok(Some(url)) => {
                counter!("golinks_cache_lookups_total", "backend" => backend, "result" => "hit")
                    .increment(1);
                return Ok(url);
            }
            Ok(None) => {
                counter!("golinks_cache_lookups_total", "backend" => backend, "result" => "miss")
                    .increment(1);
            }
            Err(e) => {
                counter!("golinks_cache_lookups_total", "backend" => backend, "result" => "error")
                    .increment(1);
                warn!("Cache lookup failed for {}: {}. Falling back to database", short_key, e);
            }
        }

        let sql = require_sql(self.dialect, Query::GetUrlByKey)?;
        let url = sqlx::query_scalar::<_, String>(sql)
            .bind(short_key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(short_key.to_string()))?;

        let outcome = self.cache.set_url(short_key, &url).await;
        self.note_cache_write(short_key, outcome);

        debug!("Resolved {} from database", short_key);
        Ok(url)
    }

    async fn modify(&self, route: Route) -> StoreResult<u64> {
        route.check()?;

        let user = self.users.get_or_create(&route.last_modified_by).await?;

        let lock_sql = require_sql(self.dialect, Query::GetLockStatusByKey)?;
        let locked = sqlx::query_scalar::<_, i64>(lock_sql)
            .bind(&route.short_key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(route.short_key.clone()))?;

        if locked != 0 && !user.is_admin {
            warn!("{} tried to modify locked route {}", user.name, route.short_key);
            return Err(StoreError::unauthorized(user.name, "modify"));
        }

        let sql = require_sql(self.dialect, Query::UpdateRouteUrl)?;
        let result = sqlx::query(sql)
            .bind(&route.url)
            .bind(user.id)
            .bind(format_timestamp(&now()))
            .bind(&route.short_key)
            .execute(&self.pool)
            .await?;

        let affected = result.rows_affected();
        if affected > 0 {
            let outcome = self.cache.refresh_url(&route.short_key, &route.url).await;
            self.note_cache_write(&route.short_key, outcome);
        }

        info!(
            "Modified route {} -> {} by {} ({} rows)",
            route.short_key, route.url, user.name, affected
        );
        Ok(affected)
    }

    async fn delete(&self, short_key: &str) -> StoreResult<()> {
        let sql = require_sql(self.dialect, Query::DeleteRouteByKey)?;
        let result = sqlx::query(sql)
            .bind(short_key)
            .execute(&self.pool)
            .await?;

        let affected = result.rows_affected();
        if affected != 1 {
            warn!("Invalid delete for {}: impacted {} rows", short_key, affected);
            return Err(StoreError::NotFound(short_key.to_string()));
        }

        let outcome = self.cache.remove(short_key).await;
        self.note_cache_write(short_key, outcome);

        info!("Deleted route {}", short_key);
        Ok(())
    }

    async fn lock(&self, route: Route) -> StoreResult<u64> {
        let user = self.users.get_or_create(&route.last_modified_by).await?;
        if !user.is_admin {
            return Err(StoreError::unauthorized(user.name, "lock"));
        }

        let sql = require_sql(self.dialect, Query::LockRoute)?;
        let result = sqlx::query(sql)
            .bind(user.id)
            .bind(format_timestamp(&now()))
            .bind(&route.short_key)
            .execute(&self.pool)
            .await?;

        info!("{} locked route {}", user.name, route.short_key);
        Ok(result.rows_affected())
    }

    async fn health(&self) -> StoreHealth {
        let database = match require_sql(self.dialect, Query::Ping) {
            Ok(sql) => sqlx::query(sql).execute(&self.pool).await.is_ok(),
            Err(_) => false,
        };

        StoreHealth {
            database,
            cache: self.cache.health_check().await,
        }
    }
}
