//! Domain layer: entities and the storage contracts they flow through.
//!
//! - [`entities`] - Route and user records, with route validation
//! - [`repositories`] - Traits implemented by the infrastructure layer
//!
//! The domain layer has no dependency on a particular database or cache.

pub mod entities;
pub mod repositories;
