//! Handler for user administration.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::api::middleware::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// Grants admin rights to `name` on behalf of the caller.
///
/// # Endpoint
///
/// `POST /api/users/{name}/admin`
///
/// # Errors
///
/// Returns 403 Forbidden unless the caller is already an admin.
pub async fn promote_user_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let updated = state
        .users
        .promote_to_admin(principal.as_str(), &name)
        .await?;

    Ok(Json(json!({
        "return_code": 200,
        "message": format!("{} promoted to admin", name),
        "updated": updated,
    })))
}
