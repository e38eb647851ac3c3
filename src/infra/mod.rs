//! Infrastructure layer - database access and repositories.
//!
//! The store handle is constructed once at startup and injected into the
//! repositories; nothing here is a module-level singleton.

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{
    CatalogDef, CatalogRepository, CatalogStore, Rectifiers, UserRepository, UserStore, Workshops,
};

#[cfg(test)]
pub use repositories::{MockCatalogRepository, MockUserRepository};
