//! Migration: Create the workshops and rectifiers tables.
//!
//! The two tables are intentionally identical apart from the tag column
//! name; they are listed, filtered and edited through the same code paths.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Workshops::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workshops::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workshops::Name).string().not_null())
                    .col(ColumnDef::new(Workshops::Category).string().not_null())
                    .col(ColumnDef::new(Workshops::Description).text().null())
                    .col(
                        ColumnDef::new(Workshops::Services)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Workshops::Rating).double().null())
                    .col(
                        ColumnDef::new(Workshops::Checked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Workshops::TenantId).string().null())
                    .col(
                        ColumnDef::new(Workshops::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rectifiers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rectifiers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rectifiers::Name).string().not_null())
                    .col(ColumnDef::new(Rectifiers::Category).string().not_null())
                    .col(ColumnDef::new(Rectifiers::Description).text().null())
                    .col(
                        ColumnDef::new(Rectifiers::Specialties)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rectifiers::Rating).double().null())
                    .col(
                        ColumnDef::new(Rectifiers::Checked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Rectifiers::TenantId).string().null())
                    .col(
                        ColumnDef::new(Rectifiers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rectifiers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Workshops::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Workshops {
    Table,
    Id,
    Name,
    Category,
    Description,
    Services,
    Rating,
    Checked,
    TenantId,
    CreatedAt,
}

#[derive(Iden)]
enum Rectifiers {
    Table,
    Id,
    Name,
    Category,
    Description,
    Specialties,
    Rating,
    Checked,
    TenantId,
    CreatedAt,
}
