//! Handlers for route management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::route::{CreateRouteRequest, MsgReturn, UpdateRouteRequest};
use crate::api::middleware::Principal;
use crate::domain::entities::Route;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a route owned by the caller.
///
/// # Endpoint
///
/// `POST /api/routes`
///
/// # Request Body
///
/// ```json
/// {
///   "short_key": "docs",
///   "url": "https://docs.example.com",
///   "team": "platform@example.com"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the key, URL or principals are malformed
/// - 409 if the short key already exists
pub async fn create_route_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<MsgReturn>), AppError> {
    payload.validate()?;

    let creator = payload.creator.unwrap_or_else(|| principal.0.clone());
    let route = Route::new(
        payload.short_key,
        payload.url,
        creator,
        payload.team.as_deref(),
    )?;

    state.store.add(route.clone()).await?;

    Ok((StatusCode::CREATED, Json(MsgReturn::created(route))))
}

/// Returns the full route for a short key.
///
/// # Endpoint
///
/// `GET /api/routes/{short_key}`
pub async fn get_route_handler(
    State(state): State<AppState>,
    Path(short_key): Path<String>,
) -> Result<Json<MsgReturn>, AppError> {
    let route = state.store.get(&short_key).await?;
    Ok(Json(MsgReturn::ok(vec![route], "Route found")))
}

/// Points an existing route at a new URL.
///
/// # Endpoint
///
/// `PUT /api/routes/{short_key}`
///
/// # Errors
///
/// - 404 if the route doesn't exist
/// - 403 if the route is locked and the caller is not an admin
pub async fn update_route_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(short_key): Path<String>,
    Json(payload): Json<UpdateRouteRequest>,
) -> Result<Json<MsgReturn>, AppError> {
    payload.validate()?;

    let current = state.store.get(&short_key).await?;
    let updated = current.modified_by(payload.url, principal.0);
    updated.check()?;

    state.store.modify(updated.clone()).await?;

    Ok(Json(MsgReturn::ok(
        vec![updated],
        format!("Route {} modified", short_key),
    )))
}

/// Deletes a route.
///
/// # Endpoint
///
/// `DELETE /api/routes/{short_key}`
///
/// A caller is still required so deletions are attributable in the logs.
pub async fn delete_route_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(short_key): Path<String>,
) -> Result<Json<MsgReturn>, AppError> {
    state.store.delete(&short_key).await?;
    tracing::info!("{} deleted route {}", principal.as_str(), short_key);

    Ok(Json(MsgReturn::ok(
        vec![],
        format!("Route {} deleted", short_key),
    )))
}

/// Locks a route so only admins can change it.
///
/// # Endpoint
///
/// `POST /api/routes/{short_key}/lock`
///
/// # Errors
///
/// - 404 if the route doesn't exist
/// - 403 if the caller is not an admin
pub async fn lock_route_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(short_key): Path<String>,
) -> Result<Json<MsgReturn>, AppError> {
    let mut route = state.store.get(&short_key).await?;
    route.last_modified_by = principal.0;

    state.store.lock(route.clone()).await?;
    route.locked = true;

    Ok(Json(MsgReturn::ok(
        vec![route],
        format!("Route {} locked", short_key),
    )))
}
