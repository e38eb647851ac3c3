//! Application state - dependency injection container.
//!
//! The store handle is created once at startup; every repository and
//! service receives it here rather than reaching for a global.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{
    CatalogRepository, CatalogStore, Database, Rectifiers, UserRepository, UserStore, Workshops,
};
use crate::services::{
    AuthService, Authenticator, CatalogManager, CatalogService, UserManager, UserService,
};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User management service (super admin only surface)
    pub user_service: Arc<dyn UserService>,
    /// Workshop directory service
    pub workshop_service: Arc<dyn CatalogService>,
    /// Engine-rectifier directory service
    pub rectifier_service: Arc<dyn CatalogService>,
    /// Database handle, kept for health checks
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire repositories and services from a connected database.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let connection = database.get_connection();

        let users: Arc<dyn UserRepository> = Arc::new(UserStore::new(connection.clone()));
        let workshops: Arc<dyn CatalogRepository> =
            Arc::new(CatalogStore::<Workshops>::new(connection.clone()));
        let rectifiers: Arc<dyn CatalogRepository> =
            Arc::new(CatalogStore::<Rectifiers>::new(connection));

        Self {
            auth_service: Arc::new(Authenticator::new(users.clone(), config)),
            user_service: Arc::new(UserManager::new(users)),
            workshop_service: Arc::new(CatalogManager::new(workshops)),
            rectifier_service: Arc::new(CatalogManager::new(rectifiers)),
            database,
        }
    }

    /// Create application state with manually injected services, e.g. mocks
    /// in tests.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        workshop_service: Arc<dyn CatalogService>,
        rectifier_service: Arc<dyn CatalogService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            workshop_service,
            rectifier_service,
            database,
        }
    }
}
