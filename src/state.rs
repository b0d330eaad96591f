//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use crate::domain::repositories::{RouteStore, UserDirectory};

/// Handler dependencies, cloned per request.
///
/// The store is held as a trait object so tests can substitute a mock or an
/// isolated in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RouteStore>,
    pub users: Arc<dyn UserDirectory>,
    /// When true, API calls without a `UserNameAuth` header are rejected.
    pub auth_required: bool,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RouteStore>,
        users: Arc<dyn UserDirectory>,
        auth_required: bool,
    ) -> Self {
        Self {
            store,
            users,
            auth_required,
        }
    }
}
