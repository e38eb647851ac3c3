//! Domain layer - core business entities and logic, independent of
//! infrastructure concerns.

pub mod catalog;
pub mod password;
pub mod user;

pub use catalog::{
    Address, AddressInput, CatalogDraft, CatalogEntry, CatalogFilter, CatalogPatch, CatalogQuery,
    Contact, ContactInput, RectifierType, SortField, SortOrder, WorkshopType,
};
pub use password::Password;
pub use user::{User, UserQuery, UserResponse, UserRole};
