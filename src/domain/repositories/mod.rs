//! Storage interfaces for the domain layer.
//!
//! Implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for unit tests.
//!
//! - [`RouteStore`] - Cache-aside route storage
//! - [`UserDirectory`] - Principal identities and admin flags

pub mod route_store;
pub mod user_directory;

pub use route_store::{RouteStore, StoreHealth};
pub use user_directory::UserDirectory;

#[cfg(test)]
pub use route_store::MockRouteStore;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
