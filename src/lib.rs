//! # golinks
//!
//! A go-link service: memorable short keys (`go/docs`) that redirect to long
//! URLs, backed by SQLite or MySQL with a cache in front of every lookup.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Route and user entities, store traits
//! - **Infrastructure Layer** ([`infrastructure`]) - SQL store, user directory, URL caches
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and principal extraction
//!
//! ## Storage
//!
//! [`infrastructure::persistence::CachedRouteStore`] is the system of record
//! access path. Reads of a short key go cache first, then database, and fill
//! the cache on a miss. Exactly one cache backs a store: a shared Redis cache
//! with a TTL, or a bounded in-process LRU table.
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_DIALECT="sqlite"
//! export DATABASE_URL="sqlite://golinks.db?mode=rwc"
//! export REDIS_URL="redis://localhost:6379"  # Optional
//!
//! cargo run --bin admin -- db migrate
//! cargo run --bin admin -- user bootstrap admin@example.com
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod routes;
pub mod server;

pub use error::{AppError, StoreError};
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::domain::entities::{Route, User};
    pub use crate::domain::repositories::{RouteStore, StoreHealth, UserDirectory};
    pub use crate::error::{AppError, StoreError, StoreResult};
    pub use crate::infrastructure::persistence::{
        CachedRouteStore, Dialect, SqlUserDirectory, StoreOptions, shared_store,
    };
    pub use crate::state::AppState;
}
