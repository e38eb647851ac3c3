//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod address;
pub mod contact;
pub mod rectifier;
pub mod user;
pub mod workshop;
