use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Errors returned by the route store and the user directory.
///
/// The store never retries; every failure is handed back to the caller, which
/// maps it onto a protocol-level response (see [`AppError`]).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Malformed route or principal, rejected before any I/O.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unique-constraint violation on insert, classified per dialect.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// No row for the given key, or a delete that did not affect exactly one row.
    #[error("no match found for {0}")]
    NotFound(String),

    /// An admin-gated write attempted by a non-admin principal.
    #[error("{principal} is not an admin, {action} refused")]
    Unauthorized { principal: String, action: &'static str },

    /// The dialect/query table has no statement for the requested operation.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any other driver or connection failure.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl StoreError {
    pub fn unauthorized(principal: impl Into<String>, action: &'static str) -> Self {
        Self::Unauthorized {
            principal: principal.into(),
            action,
        }
    }
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// Result type used across the storage layer.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    Forbidden { message: String, details: Value },
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::Unauthorized { message, details } => ("unauthorized", message, details),
            AppError::Forbidden { message, details } => ("forbidden", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(reason) => {
                AppError::bad_request("Invalid route", json!({ "reason": reason }))
            }
            StoreError::DuplicateKey(key) => {
                AppError::conflict("Short key already exists", json!({ "short_key": key }))
            }
            StoreError::NotFound(key) => {
                AppError::not_found("No match found", json!({ "short_key": key }))
            }
            StoreError::Unauthorized { principal, action } => AppError::forbidden(
                "Admin privileges required",
                json!({ "principal": principal, "action": action }),
            ),
            StoreError::Configuration(reason) => {
                tracing::error!("Store misconfigured: {}", reason);
                AppError::internal("Store misconfigured", json!({}))
            }
            StoreError::Storage(e) => {
                tracing::error!("Database error: {}", e);
                AppError::internal("Database error", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Validation failed",
            serde_json::to_value(&errors).unwrap_or(Value::Null),
        )
    }
}
