//! SQL persistence for SQLite and MySQL.
//!
//! Statements are looked up per dialect in [`dialect`] and executed through a
//! `sqlx::AnyPool`, so one implementation serves both databases.
//!
//! - [`CachedRouteStore`] - Cache-aside route storage
//! - [`SqlUserDirectory`] - Principal identities and admin flags
//! - [`shared_store`] - Process-wide get-or-build-once store accessor

pub mod cached_route_store;
pub mod db_error;
pub mod dialect;
pub mod migrate;
pub mod shared;
pub mod sql_user_directory;

pub use cached_route_store::{CachedRouteStore, StoreOptions, StoreSettings};
pub use db_error::is_duplicate_constraint;
pub use dialect::{Dialect, Query};
pub use migrate::run_migrations;
pub use shared::shared_store;
pub use sql_user_directory::SqlUserDirectory;
