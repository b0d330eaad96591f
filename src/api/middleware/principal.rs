//! Acting-principal extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Header carrying the caller's identity, set by the fronting proxy.
pub const PRINCIPAL_HEADER: &str = "UserNameAuth";

/// Used for writes when authentication is disabled and no header is sent.
pub const ANONYMOUS_PRINCIPAL: &str = "anonymous@golinks.local";

/// The principal a write is performed on behalf of.
///
/// # Header Format
///
/// ```text
/// UserNameAuth: alice@example.com
/// ```
///
/// The value is passed to the store as-is; malformed principals are rejected
/// there with `400 Bad Request`.
///
/// # Errors
///
/// Rejects with `401 Unauthorized` if the header is missing or blank and
/// [`AppState::auth_required`] is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

impl Principal {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match name {
            Some(name) => Ok(Principal(name.to_string())),
            None if !state.auth_required => Ok(Principal(ANONYMOUS_PRINCIPAL.to_string())),
            None => Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": format!("{} header is missing", PRINCIPAL_HEADER) }),
            )),
        }
    }
}
