//! User management handlers, restricted to the super admin role.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_super_admin, CurrentUser};
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{UserQuery, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::{NewUser, UserUpdate};
use crate::types::{ApiResponse, PageParams, Paginated};

/// User listing query parameters
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub search: Option<String>,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl UserListParams {
    fn into_query(self) -> UserQuery {
        let window = PageParams {
            page: self.page,
            limit: self.limit,
        };
        UserQuery {
            search: self.search.filter(|s| !s.is_empty()),
            page: window.page(),
            limit: window.limit(),
        }
    }
}

/// User creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Email address, unique across accounts
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "staff@rgvautoparts.com")]
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Role, defaults to USER
    pub role: Option<UserRole>,
}

/// User update request; omitted fields stay untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// New display name
    pub name: Option<String>,
    /// New password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    /// New role
    pub role: Option<UserRole>,
}

/// Create user management routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

/// List users (super admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "1-indexed page number"),
        ("limit" = Option<u64>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Substring match on email or name")
    ),
    responses(
        (status = 200, description = "Paginated user list"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    require_super_admin(&current_user)?;

    let query = params.into_query();
    let (page, limit) = (query.page, query.limit);
    let (users, total) = state.user_service.list_users(query).await?;

    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Paginated::new(data, page, limit, total)))
}

/// Create a new user (super admin only)
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error or email already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only")
    )
)]
pub async fn create_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    require_super_admin(&current_user)?;

    let user = state
        .user_service
        .create_user(NewUser {
            email: payload.email,
            name: payload.name,
            password: payload.password,
            role: payload.role.unwrap_or(UserRole::User),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get user by ID (super admin only)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require_super_admin(&current_user)?;

    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update user (super admin only)
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error or email already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_super_admin(&current_user)?;

    let user = state
        .user_service
        .update_user(
            id,
            UserUpdate {
                email: payload.email,
                name: payload.name,
                password: payload.password,
                role: payload.role,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete user (super admin only, cannot delete self)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Cannot delete your own account"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse>> {
    require_super_admin(&current_user)?;

    state.user_service.delete_user(current_user.id, id).await?;
    Ok(Json(ApiResponse::ok()))
}
