//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated user extracted from the session token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
}

impl CurrentUser {
    /// Check if the user may manage accounts.
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}

/// Session guard, stage one: every guarded route requires a valid token.
///
/// Extracts and validates the JWT from the Authorization header, then
/// injects the CurrentUser into the request extensions. Rejections happen
/// here, before any handler or store access.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    let current_user = CurrentUser {
        id: claims.sub,
        email: claims.email,
        name: claims.name,
        role: claims.role,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Session guard, stage two: user management requires the super admin role.
pub fn require_super_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_super_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
