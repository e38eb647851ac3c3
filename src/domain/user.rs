//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_SUPER_ADMIN, ROLE_USER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Admin,
    SuperAdmin,
}

impl UserRole {
    /// Check if this role may manage user accounts
    pub fn is_super_admin(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => ROLE_USER,
            UserRole::Admin => ROLE_ADMIN,
            UserRole::SuperAdmin => ROLE_SUPER_ADMIN,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_SUPER_ADMIN => UserRole::SuperAdmin,
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}

/// Listing request for the user-management screen: optional search over
/// email/name plus a page window. Ordering is fixed at newest-first.
#[derive(Debug, Clone)]
pub struct UserQuery {
    pub search: Option<String>,
    pub page: u64,
    pub limit: u64,
}

impl UserQuery {
    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1) * self.limit
    }
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: crate::config::DEFAULT_PAGE_NUMBER,
            limit: crate::config::DEFAULT_PAGE_SIZE,
        }
    }
}

/// User response, safe to return to clients: the password hash never leaves
/// the service boundary.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User email address
    #[schema(example = "oficina@rgvautoparts.com")]
    pub email: String,
    /// Display name
    #[schema(example = "Super Admin")]
    pub name: Option<String>,
    /// User role
    #[schema(example = "SUPER_ADMIN")]
    pub role: UserRole,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_strings() {
        assert_eq!(UserRole::from("SUPER_ADMIN"), UserRole::SuperAdmin);
        assert_eq!(UserRole::from("ADMIN"), UserRole::Admin);
        assert_eq!(UserRole::from("USER"), UserRole::User);
        // Unknown values default to the least privileged role
        assert_eq!(UserRole::from("root"), UserRole::User);

        assert_eq!(UserRole::SuperAdmin.to_string(), "SUPER_ADMIN");
    }

    #[test]
    fn role_serializes_in_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::SuperAdmin).unwrap(),
            r#""SUPER_ADMIN""#
        );
    }

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            name: None,
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
