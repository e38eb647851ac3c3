//! Seed command - initial data bootstrap.
//!
//! User accounts are otherwise created only by a super admin, so the first
//! one has to come from here.

use std::sync::Arc;

use crate::cli::args::{SeedArgs, SeedTarget};
use crate::config::Config;
use crate::domain::{Password, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, UserRepository, UserStore};

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.target {
        SeedTarget::Admin(admin) => {
            let users = Arc::new(UserStore::new(db.get_connection()));

            if users.find_by_email(&admin.email).await?.is_some() {
                tracing::warn!(email = %admin.email, "Super admin already exists, skipping seed");
                return Ok(());
            }

            let password_hash = Password::new(&admin.password)?.into_string();
            let user = users
                .create(
                    admin.email,
                    Some(admin.name),
                    password_hash,
                    UserRole::SuperAdmin,
                )
                .await?;

            tracing::info!(email = %user.email, "Super admin created");
        }
    }

    Ok(())
}
