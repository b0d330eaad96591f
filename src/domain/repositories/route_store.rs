//! Store interface consumed by the HTTP layer and the admin CLI.

use crate::domain::entities::Route;
use crate::error::StoreResult;
use async_trait::async_trait;
use serde::Serialize;

/// Liveness of the store's two backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreHealth {
    pub database: bool,
    pub cache: bool,
}

/// Cache-aside route storage.
///
/// Row counts are the literal values reported by the database for the single
/// statement executed; anything other than `1` for a key operation is abnormal.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::CachedRouteStore`] - SQL store fronted by a URL cache
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Persists a new route. The cache is left untouched.
    ///
    /// # Errors
    ///
    /// - [`crate::error::StoreError::Validation`] for malformed routes
    /// - [`crate::error::StoreError::DuplicateKey`] if the short key exists
    /// - [`crate::error::StoreError::Storage`] on other database errors
    async fn add(&self, route: Route) -> StoreResult<u64>;

    /// Loads the full route from the database, bypassing the cache.
    async fn get(&self, short_key: &str) -> StoreResult<Route>;

    /// Resolves a short key to its URL, cache first.
    async fn get_url(&self, short_key: &str) -> StoreResult<String>;

    /// Changes the URL of an existing route.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StoreError::Unauthorized`] if the route is locked
    /// and `route.last_modified_by` is not an admin.
    async fn modify(&self, route: Route) -> StoreResult<u64>;

    /// Removes a route and evicts it from the cache.
    async fn delete(&self, short_key: &str) -> StoreResult<()>;

    /// Locks a route on behalf of `route.last_modified_by`, who must be an admin.
    async fn lock(&self, route: Route) -> StoreResult<u64>;

    async fn health(&self) -> StoreHealth;
}
