//! Contact database entity for SeaORM.
//!
//! Same exclusive-ownership pattern as the address entity.

use sea_orm::entity::prelude::*;

use crate::domain::Contact;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub phone: Option<String>,
    pub phone_alt: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    #[sea_orm(unique)]
    pub workshop_id: Option<Uuid>,
    #[sea_orm(unique)]
    pub rectifier_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workshop::Entity",
        from = "Column::WorkshopId",
        to = "super::workshop::Column::Id"
    )]
    Workshop,
    #[sea_orm(
        belongs_to = "super::rectifier::Entity",
        from = "Column::RectifierId",
        to = "super::rectifier::Column::Id"
    )]
    Rectifier,
}

impl Related<super::workshop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workshop.def()
    }
}

impl Related<super::rectifier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rectifier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Contact {
    fn from(model: Model) -> Self {
        Contact {
            id: model.id,
            phone: model.phone,
            phone_alt: model.phone_alt,
            email: model.email,
            whatsapp: model.whatsapp,
            website: model.website,
            facebook: model.facebook,
            instagram: model.instagram,
        }
    }
}
