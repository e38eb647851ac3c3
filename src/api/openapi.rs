//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, catalog_handler, user_handler};
use crate::domain::{
    Address, AddressInput, Contact, ContactInput, RectifierType, SortField, SortOrder,
    UserResponse, UserRole, WorkshopType,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the Talleres Lima directory API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Talleres Lima API",
        version = "0.1.0",
        description = "Admin API for a directory of auto-repair workshops and engine rectifiers in Lima",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::login,
        // Workshop endpoints
        catalog_handler::list_workshops,
        catalog_handler::create_workshop,
        catalog_handler::get_workshop,
        catalog_handler::update_workshop,
        catalog_handler::delete_workshop,
        // Rectifier endpoints
        catalog_handler::list_rectifiers,
        catalog_handler::create_rectifier,
        catalog_handler::get_rectifier,
        catalog_handler::update_rectifier,
        catalog_handler::delete_rectifier,
        // User endpoints
        user_handler::list_users,
        user_handler::create_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            WorkshopType,
            RectifierType,
            SortField,
            SortOrder,
            Address,
            Contact,
            AddressInput,
            ContactInput,
            // Auth types
            auth_handler::LoginRequest,
            TokenResponse,
            // Catalog handler types
            catalog_handler::CreateWorkshopRequest,
            catalog_handler::UpdateWorkshopRequest,
            catalog_handler::WorkshopResponse,
            catalog_handler::CreateRectifierRequest,
            catalog_handler::UpdateRectifierRequest,
            catalog_handler::RectifierResponse,
            // User handler types
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Credential exchange"),
        (name = "Workshops", description = "Workshop directory management"),
        (name = "Rectifiers", description = "Engine-rectifier directory management"),
        (name = "Users", description = "User management (super admin only)")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
