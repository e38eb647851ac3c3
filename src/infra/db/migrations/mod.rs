//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250115_000001_create_users_table;
mod m20250115_000002_create_catalog_tables;
mod m20250115_000003_create_sub_record_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250115_000001_create_users_table::Migration),
            Box::new(m20250115_000002_create_catalog_tables::Migration),
            Box::new(m20250115_000003_create_sub_record_tables::Migration),
        ]
    }
}
