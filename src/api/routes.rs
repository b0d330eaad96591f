//! API route configuration.
//!
//! Writes require a `UserNameAuth` header (see
//! [`crate::api::middleware::Principal`]).

use crate::api::handlers::{
    create_route_handler, delete_route_handler, get_route_handler, lock_route_handler,
    promote_user_handler, update_route_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /routes`                   - Create a route
/// - `GET    /routes/{short_key}`       - Show a route
/// - `PUT    /routes/{short_key}`       - Change a route's URL
/// - `DELETE /routes/{short_key}`       - Delete a route
/// - `POST   /routes/{short_key}/lock`  - Lock a route (admin)
/// - `POST   /users/{name}/admin`       - Promote a user (admin)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/routes", post(create_route_handler))
        .route(
            "/routes/{short_key}",
            get(get_route_handler)
                .put(update_route_handler)
                .delete(delete_route_handler),
        )
        .route("/routes/{short_key}/lock", post(lock_route_handler))
        .route("/users/{name}/admin", post(promote_user_handler))
}
