//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::catalog_repository::contains_insensitive;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{User, UserQuery, UserRole};
use crate::errors::{AppError, AppResult};

/// User repository trait for dependency injection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by exact email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Check whether an email is used by another user; `exclude` skips the
    /// caller's own row on update
    async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool>;

    /// Windowed listing, newest first, with an optional email/name search
    async fn search(&self, query: UserQuery) -> AppResult<(Vec<User>, u64)>;

    /// Create a new user (password already hashed)
    async fn create(
        &self,
        email: String,
        name: Option<String>,
        password_hash: String,
        role: UserRole,
    ) -> AppResult<User>;

    /// Update user fields; `None` leaves a field untouched
    async fn update(
        &self,
        id: Uuid,
        email: Option<String>,
        name: Option<String>,
        password_hash: Option<String>,
        role: Option<UserRole>,
    ) -> AppResult<User>;

    /// Delete user by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let mut select = UserEntity::find().filter(user::Column::Email.eq(email));
        if let Some(id) = exclude {
            select = select.filter(user::Column::Id.ne(id));
        }

        let existing = select.one(&self.db).await.map_err(AppError::from)?;
        Ok(existing.is_some())
    }

    async fn search(&self, query: UserQuery) -> AppResult<(Vec<User>, u64)> {
        let mut condition = Condition::all();
        if let Some(needle) = &query.search {
            condition = condition.add(
                Condition::any()
                    .add(contains_insensitive(
                        Expr::col((user::Entity, user::Column::Email)),
                        needle,
                    ))
                    .add(contains_insensitive(
                        Expr::col((user::Entity, user::Column::Name)),
                        needle,
                    )),
            );
        }

        let select = UserEntity::find().filter(condition);
        let page_select = select
            .clone()
            .order_by(user::Column::CreatedAt, Order::Desc)
            .offset(query.offset())
            .limit(query.limit);

        let (total, models) =
            tokio::try_join!(select.count(&self.db), page_select.all(&self.db))?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn create(
        &self,
        email: String,
        name: Option<String>,
        password_hash: String,
        role: UserRole,
    ) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            name: Set(name),
            role: Set(role.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn update(
        &self,
        id: Uuid,
        email: Option<String>,
        name: Option<String>,
        password_hash: Option<String>,
        role: Option<UserRole>,
    ) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();

        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(name) = name {
            active.name = Set(Some(name));
        }
        if let Some(password_hash) = password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(role) = role {
            active.role = Set(role.as_str().to_string());
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn search_matches_email_or_name_case_insensitively() {
        let condition = Condition::any()
            .add(contains_insensitive(
                Expr::col((user::Entity, user::Column::Email)),
                "Admin",
            ))
            .add(contains_insensitive(
                Expr::col((user::Entity, user::Column::Name)),
                "Admin",
            ));

        let sql = UserEntity::find()
            .filter(condition)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(
            sql.contains(r#"LOWER("users"."email") LIKE '%admin%'"#),
            "{sql}"
        );
        assert!(
            sql.contains(r#"LOWER("users"."name") LIKE '%admin%'"#),
            "{sql}"
        );
        assert!(sql.contains(" OR "), "{sql}");
    }
}
