//! Application services layer - use cases and business logic.
//!
//! Services orchestrate domain logic and repositories to fulfill
//! application use cases. They depend on repository traits for
//! dependency inversion.

mod auth_service;
mod catalog_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use catalog_service::{CatalogManager, CatalogService};
pub use user_service::{NewUser, UserManager, UserService, UserUpdate};
