mod common;

use common::RecordingCache;
use golinks::domain::repositories::{RouteStore, UserDirectory};
use golinks::error::StoreError;
use golinks::infrastructure::cache::CacheKind;
use golinks::infrastructure::persistence::{CachedRouteStore, Dialect, StoreOptions};
use std::sync::Arc;

async fn store_with(cache: Arc<RecordingCache>) -> (CachedRouteStore, sqlx::AnyPool) {
    let pool = common::sqlite_pool().await;
    let store = CachedRouteStore::with_cache(Dialect::Sqlite, pool.clone(), cache);
    (store, pool)
}

#[tokio::test]
async fn test_second_lookup_skips_database() {
    let cache = Arc::new(RecordingCache::new());
    let (store, _pool) = store_with(cache.clone()).await;
    assert_eq!(store.cache_kind(), CacheKind::Remote);

    store
        .add(common::test_route("a", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();
    assert!(cache.calls().is_empty(), "add must not touch the cache");

    store.get_url("a").await.unwrap();
    store.get_url("a").await.unwrap();

    assert_eq!(cache.calls(), vec!["get:a", "set:a", "get:a"]);
}

#[tokio::test]
async fn test_negative_results_are_not_cached() {
    let cache = Arc::new(RecordingCache::new());
    let (store, _pool) = store_with(cache.clone()).await;

    let result = store.get_url("nope").await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
    assert_eq!(cache.calls_for("set"), 0);
}

#[tokio::test]
async fn test_modify_overwrites_cached_url() {
    let cache = Arc::new(RecordingCache::new());
    let (store, _pool) = store_with(cache.clone()).await;

    store
        .add(common::test_route("a", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();
    store.get_url("a").await.unwrap();

    let route = store.get("a").await.unwrap();
    store
        .modify(route.modified_by("http://www.t.com", "t@t.com"))
        .await
        .unwrap();

    assert_eq!(cache.cached("a").as_deref(), Some("http://www.t.com"));
}

#[tokio::test]
async fn test_denied_modify_leaves_cache_alone() {
    let cache = Arc::new(RecordingCache::new());
    let (store, _pool) = store_with(cache.clone()).await;
    store.users().bootstrap_admin("admin@t.com").await.unwrap();

    store
        .add(common::test_route("a", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();
    let route = store.get("a").await.unwrap();
    store
        .lock(route.modified_by(route.url.clone(), "admin@t.com"))
        .await
        .unwrap();
    store.get_url("a").await.unwrap();
    let before = cache.calls().len();

    let result = store
        .modify(route.modified_by("http://www.t.com", "t@t.com"))
        .await;

    assert!(matches!(result, Err(StoreError::Unauthorized { .. })));
    assert_eq!(cache.calls().len(), before);
    assert_eq!(cache.cached("a").as_deref(), Some("http://www.google.com"));
}

#[tokio::test]
async fn test_delete_unknown_key_performs_no_cache_mutation() {
    let cache = Arc::new(RecordingCache::new());
    let (store, _pool) = store_with(cache.clone()).await;

    let result = store.delete("nothing").await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
    assert!(cache.calls().is_empty());
}

#[tokio::test]
async fn test_delete_evicts_entry() {
    let cache = Arc::new(RecordingCache::new());
    let (store, _pool) = store_with(cache.clone()).await;

    store
        .add(common::test_route("a", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();
    store.get_url("a").await.unwrap();

    store.delete("a").await.unwrap();

    assert_eq!(cache.calls_for("remove"), 1);
    assert_eq!(cache.cached("a"), None);
}

#[tokio::test]
async fn test_failing_cache_never_fails_operations() {
    let cache = Arc::new(RecordingCache::failing());
    let (store, _pool) = store_with(cache.clone()).await;

    store
        .add(common::test_route("a", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();

    // Lookup errors read as misses, set errors are swallowed.
    assert_eq!(store.get_url("a").await.unwrap(), "http://www.google.com");
    assert_eq!(store.get_url("a").await.unwrap(), "http://www.google.com");

    let route = store.get("a").await.unwrap();
    assert_eq!(
        store
            .modify(route.modified_by("http://www.t.com", "t@t.com"))
            .await
            .unwrap(),
        1
    );
    assert_eq!(store.get_url("a").await.unwrap(), "http://www.t.com");

    store.delete("a").await.unwrap();
    assert!(matches!(
        store.get_url("a").await,
        Err(StoreError::NotFound(_))
    ));

    let health = store.health().await;
    assert!(health.database);
    assert!(!health.cache);
}

#[tokio::test]
async fn test_delete_from_another_store_evicts_shared_cache() {
    let cache = Arc::new(RecordingCache::new());
    let (server, pool) = store_with(cache.clone()).await;
    let admin = CachedRouteStore::with_cache(Dialect::Sqlite, pool, cache.clone());
    assert!(admin.cache_kind().is_shared());

    server
        .add(common::test_route("a", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();
    server.get_url("a").await.unwrap();

    admin.delete("a").await.unwrap();

    assert!(matches!(
        server.get_url("a").await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_local_cache_is_not_evicted_by_another_store() {
    let pool = common::sqlite_pool().await;
    let server = CachedRouteStore::new(pool.clone(), StoreOptions::new(Dialect::Sqlite));
    let admin = CachedRouteStore::new(pool, StoreOptions::new(Dialect::Sqlite));
    assert!(!admin.cache_kind().is_shared());

    server
        .add(common::test_route("a", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();
    server.get_url("a").await.unwrap();

    admin.delete("a").await.unwrap();

    // The server's private entry outlives the row.
    assert_eq!(server.get_url("a").await.unwrap(), "http://www.google.com");
}
