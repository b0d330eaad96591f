//! Handler for go-link redirects.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its URL.
///
/// # Endpoint
///
/// `GET /{short_key}`
///
/// Resolution goes through [`crate::domain::repositories::RouteStore::get_url`],
/// so repeated hits are served from the cache.
///
/// # Errors
///
/// Returns 404 Not Found if the short key doesn't exist.
pub async fn redirect_handler(
    Path(short_key): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let url = state.store.get_url(&short_key).await?;
    debug!("Redirecting {} to {}", short_key, url);

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}
