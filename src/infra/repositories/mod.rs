//! Repository layer - data access abstraction over the injected store
//! handle.

pub mod catalog_repository;
pub mod entities;
mod user_repository;

pub use catalog_repository::{
    CatalogDef, CatalogRepository, CatalogStore, Rectifiers, Workshops,
};
pub use user_repository::{UserRepository, UserStore};

#[cfg(test)]
pub use catalog_repository::MockCatalogRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
