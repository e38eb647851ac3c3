//! Migration: Create the addresses and contacts tables.
//!
//! Both carry mutually exclusive owner columns pointing at workshops or
//! rectifiers. Each owner column is unique (at most one sub-record per
//! parent) and cascades on parent deletion.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Addresses::Street).string().null())
                    .col(ColumnDef::new(Addresses::District).string().not_null())
                    .col(ColumnDef::new(Addresses::Province).string().not_null())
                    .col(ColumnDef::new(Addresses::Country).string().not_null())
                    .col(ColumnDef::new(Addresses::Latitude).double().null())
                    .col(ColumnDef::new(Addresses::Longitude).double().null())
                    .col(
                        ColumnDef::new(Addresses::WorkshopId)
                            .uuid()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Addresses::RectifierId)
                            .uuid()
                            .null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_addresses_workshop_id")
                            .from(Addresses::Table, Addresses::WorkshopId)
                            .to(Workshops::Table, Workshops::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_addresses_rectifier_id")
                            .from(Addresses::Table, Addresses::RectifierId)
                            .to(Rectifiers::Table, Rectifiers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contacts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contacts::Phone).string().null())
                    .col(ColumnDef::new(Contacts::PhoneAlt).string().null())
                    .col(ColumnDef::new(Contacts::Email).string().null())
                    .col(ColumnDef::new(Contacts::Whatsapp).string().null())
                    .col(ColumnDef::new(Contacts::Website).string().null())
                    .col(ColumnDef::new(Contacts::Facebook).string().null())
                    .col(ColumnDef::new(Contacts::Instagram).string().null())
                    .col(
                        ColumnDef::new(Contacts::WorkshopId)
                            .uuid()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Contacts::RectifierId)
                            .uuid()
                            .null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_workshop_id")
                            .from(Contacts::Table, Contacts::WorkshopId)
                            .to(Workshops::Table, Workshops::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_rectifier_id")
                            .from(Contacts::Table, Contacts::RectifierId)
                            .to(Rectifiers::Table, Rectifiers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Addresses {
    Table,
    Id,
    Street,
    District,
    Province,
    Country,
    Latitude,
    Longitude,
    WorkshopId,
    RectifierId,
}

#[derive(Iden)]
enum Contacts {
    Table,
    Id,
    Phone,
    PhoneAlt,
    Email,
    Whatsapp,
    Website,
    Facebook,
    Instagram,
    WorkshopId,
    RectifierId,
}

#[derive(Iden)]
enum Workshops {
    Table,
    Id,
}

#[derive(Iden)]
enum Rectifiers {
    Table,
    Id,
}
