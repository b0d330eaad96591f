mod common;

use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use golinks::api::middleware::PRINCIPAL_HEADER;
use golinks::domain::repositories::UserDirectory;
use golinks::infrastructure::persistence::{
    CachedRouteStore, Dialect, SqlUserDirectory, StoreOptions,
};
use golinks::routes::app_router;
use golinks::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;

async fn test_server() -> (TestServer, Arc<SqlUserDirectory>) {
    let pool = common::sqlite_pool().await;
    let store = Arc::new(CachedRouteStore::new(
        pool.clone(),
        StoreOptions::new(Dialect::Sqlite),
    ));
    let users = Arc::new(SqlUserDirectory::new(Dialect::Sqlite, pool));

    let state = AppState::new(store, users.clone(), true);
    let app = ServiceExt::<Request>::into_make_service(app_router(state));
    let server = TestServer::new(app).unwrap();
    (server, users)
}

async fn create(server: &TestServer, key: &str, url: &str, principal: &str) -> u16 {
    server
        .post("/api/routes")
        .add_header(PRINCIPAL_HEADER, principal)
        .json(&json!({ "short_key": key, "url": url }))
        .await
        .status_code()
        .as_u16()
}

#[tokio::test]
async fn test_create_and_redirect() {
    let (server, _users) = test_server().await;

    assert_eq!(
        create(&server, "docs", "https://docs.example.com", "t@t.com").await,
        201
    );

    let response = server.get("/docs").await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://docs.example.com");
}

#[tokio::test]
async fn test_redirect_unknown_key() {
    let (server, _users) = test_server().await;

    let response = server.get("/missing").await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_duplicate_create_conflicts() {
    let (server, _users) = test_server().await;

    create(&server, "docs", "https://docs.example.com", "t@t.com").await;
    let status = create(&server, "docs", "https://other.example.com", "t@t.com").await;

    assert_eq!(status, 409);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _users) = test_server().await;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_locked_route_workflow() {
    let (server, users) = test_server().await;
    users.bootstrap_admin("admin@t.com").await.unwrap();

    create(&server, "docs", "https://docs.example.com", "t@t.com").await;

    let response = server
        .post("/api/routes/docs/lock")
        .add_header(PRINCIPAL_HEADER, "t@t.com")
        .await;
    assert_eq!(response.status_code(), 403);

    let response = server
        .post("/api/routes/docs/lock")
        .add_header(PRINCIPAL_HEADER, "admin@t.com")
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server
        .put("/api/routes/docs")
        .add_header(PRINCIPAL_HEADER, "t@t.com")
        .json(&json!({ "url": "https://new.example.com" }))
        .await;
    assert_eq!(response.status_code(), 403);

    let response = server
        .put("/api/routes/docs")
        .add_header(PRINCIPAL_HEADER, "admin@t.com")
        .json(&json!({ "url": "https://new.example.com" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server.get("/docs").await;
    assert_eq!(response.header("location"), "https://new.example.com");

    let response = server.get("/api/routes/docs").await;
    let body: Value = response.json();
    assert_eq!(body["routes"][0]["locked"], true);
    assert_eq!(body["routes"][0]["last_modified_by"], "admin@t.com");
}

#[tokio::test]
async fn test_delete_route() {
    let (server, _users) = test_server().await;

    create(&server, "docs", "https://docs.example.com", "t@t.com").await;
    server.get("/docs").await;

    let response = server
        .delete("/api/routes/docs")
        .add_header(PRINCIPAL_HEADER, "t@t.com")
        .await;
    assert_eq!(response.status_code(), 200);

    assert_eq!(server.get("/docs").await.status_code(), 404);

    let response = server
        .delete("/api/routes/docs")
        .add_header(PRINCIPAL_HEADER, "t@t.com")
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_promote_user() {
    let (server, users) = test_server().await;
    users.bootstrap_admin("admin@t.com").await.unwrap();

    let response = server
        .post("/api/users/t@t.com/admin")
        .add_header(PRINCIPAL_HEADER, "other@t.com")
        .await;
    assert_eq!(response.status_code(), 403);

    let response = server
        .post("/api/users/t@t.com/admin")
        .add_header(PRINCIPAL_HEADER, "admin@t.com")
        .await;
    assert_eq!(response.status_code(), 200);

    assert!(users.get_or_create("t@t.com").await.unwrap().is_admin);
}

#[tokio::test]
async fn test_writes_require_principal() {
    let (server, _users) = test_server().await;

    let response = server
        .post("/api/routes")
        .json(&json!({ "short_key": "docs", "url": "https://docs.example.com" }))
        .await;

    assert_eq!(response.status_code(), 401);
}
