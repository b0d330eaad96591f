//! Core domain entities.
//!
//! - [`Route`] - A short key mapped to a destination URL, with ownership and lock metadata
//! - [`User`] - A principal with a durable identity and an admin flag
//!
//! Entities are plain data; persistence lives in [`crate::infrastructure::persistence`].

pub mod route;
pub mod user;

pub use route::Route;
pub use user::User;
