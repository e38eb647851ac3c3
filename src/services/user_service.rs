//! User management service, exposed only to super admins.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Password, User, UserQuery, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Fields accepted when creating a user account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
    pub role: UserRole,
}

/// Partial update of a user account; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Windowed listing with optional email/name search
    async fn list_users(&self, query: UserQuery) -> AppResult<(Vec<User>, u64)>;

    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Create a new user; the email must not be in use
    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;

    /// Update user details; an email change must not collide with another
    /// account
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> AppResult<User>;

    /// Delete a user. `actor` is the authenticated caller, who may not
    /// delete their own account.
    async fn delete_user(&self, actor: Uuid, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using the repository.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self, query: UserQuery) -> AppResult<(Vec<User>, u64)> {
        self.users.search(query).await
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        // Duplicate check precedes the write so the client sees a clean
        // conflict instead of a constraint violation
        if self.users.email_taken(&new_user.email, None).await? {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&new_user.password)?.into_string();
        self.users
            .create(new_user.email, new_user.name, password_hash, new_user.role)
            .await
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> AppResult<User> {
        if let Some(email) = &update.email {
            if self.users.email_taken(email, Some(id)).await? {
                return Err(AppError::conflict("Email"));
            }
        }

        let password_hash = match &update.password {
            Some(password) => Some(Password::new(password)?.into_string()),
            None => None,
        };

        self.users
            .update(id, update.email, update.name, password_hash, update.role)
            .await
    }

    async fn delete_user(&self, actor: Uuid, id: Uuid) -> AppResult<()> {
        if actor == id {
            return Err(AppError::validation("Cannot delete your own account"));
        }

        self.users.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::infra::MockUserRepository;

    fn sample_user(id: Uuid) -> User {
        User {
            id,
            email: "test@example.com".to_string(),
            password_hash: "hashed".to_string(),
            name: Some("Test User".to_string()),
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn get_user_maps_missing_row_to_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(repo));
        let result = service.get_user(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_email_before_writing() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_taken().returning(|_, _| Ok(true));
        // No expect_create: reaching the write would panic the mock

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .create_user(NewUser {
                email: "taken@example.com".to_string(),
                name: None,
                password: "password123".to_string(),
                role: UserRole::User,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn create_user_hashes_the_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_taken().returning(|_, _| Ok(false));
        repo.expect_create()
            .withf(|_, _, hash, _| hash.starts_with("$argon2") && hash != "password123")
            .returning(|email, name, hash, role| {
                let mut user = sample_user(Uuid::new_v4());
                user.email = email;
                user.name = name;
                user.password_hash = hash;
                user.role = role;
                Ok(user)
            });

        let service = UserManager::new(Arc::new(repo));
        let user = service
            .create_user(NewUser {
                email: "new@example.com".to_string(),
                name: Some("New User".to_string()),
                password: "password123".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn update_user_excludes_self_from_email_conflict_check() {
        let id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_email_taken()
            .withf(move |email, exclude| email == "same@example.com" && *exclude == Some(id))
            .returning(|_, _| Ok(false));
        repo.expect_update()
            .returning(|id, _, _, _, _| Ok(sample_user(id)));

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .update_user(
                id,
                UserUpdate {
                    email: Some("same@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn update_user_rejects_email_owned_by_another_account() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_taken().returning(|_, _| Ok(true));

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .update_user(
                Uuid::new_v4(),
                UserUpdate {
                    email: Some("other@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn delete_user_rejects_self_deletion_and_keeps_the_row() {
        let actor = Uuid::new_v4();

        let repo = MockUserRepository::new();
        // No expect_delete: the guard must fail before any store access

        let service = UserManager::new(Arc::new(repo));
        let result = service.delete_user(actor, actor).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_user_removes_other_accounts() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Ok(()));

        let service = UserManager::new(Arc::new(repo));
        let result = service.delete_user(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(result.is_ok());
    }
}
