mod common;

use golinks::domain::entities::Route;
use golinks::domain::repositories::{RouteStore, UserDirectory};
use golinks::error::StoreError;
use golinks::infrastructure::cache::CacheKind;
use golinks::infrastructure::persistence::{CachedRouteStore, Dialect, StoreOptions};

async fn local_store() -> (CachedRouteStore, sqlx::AnyPool) {
    let pool = common::sqlite_pool().await;
    let store = CachedRouteStore::new(pool.clone(), StoreOptions::new(Dialect::Sqlite));
    (store, pool)
}

#[tokio::test]
async fn test_default_store_uses_local_cache() {
    let (store, _pool) = local_store().await;

    assert_eq!(store.cache_kind(), CacheKind::Local);
    assert_eq!(store.dialect(), Dialect::Sqlite);
}

#[tokio::test]
async fn test_add_then_get() {
    let (store, _pool) = local_store().await;
    let route = Route::new(
        "d",
        "http://www.google.com",
        "test@testuser.com",
        Some("testteam@t.com"),
    )
    .unwrap();

    let affected = store.add(route.clone()).await.unwrap();
    assert_eq!(affected, 1);

    let stored = store.get("d").await.unwrap();
    assert_eq!(stored.url, "http://www.google.com");
    assert_eq!(stored.creator, "test@testuser.com");
    assert_eq!(stored.team, "testteam@t.com");
    assert_eq!(stored.last_modified_by, "test@testuser.com");
    assert_eq!(stored.created_at, route.created_at);
    assert!(!stored.locked);
}

#[tokio::test]
async fn test_add_duplicate_key() {
    let (store, _pool) = local_store().await;

    store
        .add(common::test_route("dup", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();

    let result = store
        .add(common::test_route("dup", "http://www.bing.com", "other@t.com"))
        .await;

    assert!(matches!(result, Err(StoreError::DuplicateKey(key)) if key == "dup"));
    assert_eq!(store.get("dup").await.unwrap().url, "http://www.google.com");
}

#[tokio::test]
async fn test_add_rejects_invalid_route_before_io() {
    let (store, pool) = local_store().await;

    let mut route = common::test_route("bad", "http://www.google.com", "t@t.com");
    route.url = "www.google.com".to_string();

    let result = store.add(route).await;

    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert_eq!(common::user_count(&pool).await, 0);
}

#[tokio::test]
async fn test_add_does_not_populate_cache() {
    let (store, pool) = local_store().await;

    store
        .add(common::test_route("cold", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();
    common::delete_row(&pool, "cold").await;

    let result = store.get_url("cold").await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_get_url_is_served_from_cache_after_miss() {
    let (store, pool) = local_store().await;

    store
        .add(common::test_route("hot", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();

    assert_eq!(store.get_url("hot").await.unwrap(), "http://www.google.com");

    // The row is gone, so a second answer can only come from the cache.
    common::delete_row(&pool, "hot").await;
    assert_eq!(store.get_url("hot").await.unwrap(), "http://www.google.com");

    // Full-record reads never use the cache.
    assert!(matches!(
        store.get("hot").await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_get_url_unknown_key() {
    let (store, _pool) = local_store().await;

    let result = store.get_url("missing").await;

    assert!(matches!(result, Err(StoreError::NotFound(key)) if key == "missing"));
}

#[tokio::test]
async fn test_modify_locked_route() {
    let (store, pool) = local_store().await;
    store.users().bootstrap_admin("admin@t.com").await.unwrap();

    store
        .add(common::test_route("a", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();
    // Warm the cache with the original URL.
    assert_eq!(store.get_url("a").await.unwrap(), "http://www.google.com");

    let route = store.get("a").await.unwrap();
    let locked = route.modified_by(route.url.clone(), "admin@t.com");
    assert_eq!(store.lock(locked).await.unwrap(), 1);
    assert!(store.get("a").await.unwrap().locked);

    let by_owner = route.modified_by("http://www.t.com", "t@t.com");
    let result = store.modify(by_owner).await;
    assert!(matches!(
        result,
        Err(StoreError::Unauthorized { ref principal, action: "modify" }) if principal == "t@t.com"
    ));
    assert_eq!(
        common::stored_url(&pool, "a").await.as_deref(),
        Some("http://www.google.com")
    );
    assert_eq!(store.get_url("a").await.unwrap(), "http://www.google.com");

    let by_admin = route.modified_by("http://www.t.com", "admin@t.com");
    assert_eq!(store.modify(by_admin).await.unwrap(), 1);

    let stored = store.get("a").await.unwrap();
    assert_eq!(stored.url, "http://www.t.com");
    assert_eq!(stored.last_modified_by, "admin@t.com");
    assert_eq!(store.get_url("a").await.unwrap(), "http://www.t.com");
}

#[tokio::test]
async fn test_modify_unknown_key() {
    let (store, _pool) = local_store().await;

    let route = common::test_route("ghost", "http://www.google.com", "t@t.com");
    let result = store.modify(route).await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_lock_requires_admin() {
    let (store, _pool) = local_store().await;

    store
        .add(common::test_route("l", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();

    let route = store.get("l").await.unwrap();
    let result = store.lock(route).await;

    assert!(matches!(
        result,
        Err(StoreError::Unauthorized { action: "lock", .. })
    ));
    assert!(!store.get("l").await.unwrap().locked);
}

#[tokio::test]
async fn test_delete_unknown_key() {
    let (store, _pool) = local_store().await;

    let result = store.delete("nothing").await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_evicts_cache() {
    let (store, _pool) = local_store().await;

    store
        .add(common::test_route("gone", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();
    store.get_url("gone").await.unwrap();

    store.delete("gone").await.unwrap();

    assert!(matches!(
        store.get_url("gone").await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_add_get_modify_delete_scenario() {
    let (store, _pool) = local_store().await;

    store
        .add(common::test_route("a", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();
    assert_eq!(store.get_url("a").await.unwrap(), "http://www.google.com");

    let current = store.get("a").await.unwrap();
    let changed = current.modified_by("http://www.t.com", "t@t.com");
    assert_eq!(store.modify(changed).await.unwrap(), 1);
    assert_eq!(store.get_url("a").await.unwrap(), "http://www.t.com");

    store.delete("a").await.unwrap();
    assert!(matches!(store.get("a").await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_team_and_creator_share_identity() {
    let (store, pool) = local_store().await;

    store
        .add(common::test_route("solo", "http://www.google.com", "t@t.com"))
        .await
        .unwrap();

    assert_eq!(common::user_count(&pool).await, 1);
}

#[tokio::test]
async fn test_local_cache_capacity_bounds_entries() {
    let pool = common::sqlite_pool().await;
    let store = CachedRouteStore::new(
        pool.clone(),
        StoreOptions::new(Dialect::Sqlite).with_local_capacity(2),
    );

    assert_eq!(store.settings().local_cache_capacity, Some(2));

    for key in ["k1", "k2", "k3"] {
        store
            .add(common::test_route(key, "http://www.google.com", "t@t.com"))
            .await
            .unwrap();
        store.get_url(key).await.unwrap();
    }

    // Evicted entries fall back to the database.
    for key in ["k1", "k2", "k3"] {
        assert_eq!(store.get_url(key).await.unwrap(), "http://www.google.com");
    }
}

#[tokio::test]
async fn test_health_reports_database() {
    let (store, pool) = local_store().await;

    assert!(store.health().await.database);

    pool.close().await;
    assert!(!store.health().await.database);
}
