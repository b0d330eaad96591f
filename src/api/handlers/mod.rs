//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod redirect;
pub mod routes;
pub mod users;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use routes::{
    create_route_handler, delete_route_handler, get_route_handler, lock_route_handler,
    update_route_handler,
};
pub use users::promote_user_handler;
