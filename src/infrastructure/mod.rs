//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`cache`] - URL caches (bounded in-process and Redis)
//! - [`persistence`] - SQLite/MySQL store and user directory

pub mod cache;
pub mod persistence;
