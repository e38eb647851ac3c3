//! HTTP request handlers.

pub mod auth_handler;
pub mod catalog_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use catalog_handler::{rectifier_routes, workshop_routes};
pub use user_handler::user_routes;
