//! DTOs for route management endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Route;

/// Request body for `POST /api/routes`.
///
/// `creator` defaults to the calling principal and `team` to the creator.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 1, max = 64))]
    pub short_key: String,

    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    pub creator: Option<String>,
    pub team: Option<String>,
}

/// Request body for `PUT /api/routes/{short_key}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// Envelope for every successful route response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MsgReturn {
    pub return_code: u16,
    pub routes: Vec<Route>,
    pub message: String,
}

impl MsgReturn {
    pub fn ok(routes: Vec<Route>, message: impl Into<String>) -> Self {
        Self {
            return_code: 200,
            routes,
            message: message.into(),
        }
    }

    pub fn created(route: Route) -> Self {
        Self {
            return_code: 201,
            message: format!("Route {} created", route.short_key),
            routes: vec![route],
        }
    }
}
