//! Engine-rectifier database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::CatalogEntry;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rectifiers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub specialties: Vec<String>,
    pub rating: Option<f64>,
    pub checked: bool,
    pub tenant_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::address::Entity")]
    Address,
    #[sea_orm(has_one = "super::contact::Entity")]
    Contact,
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Address.def()
    }
}

impl Related<super::contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contact.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CatalogEntry {
    fn from(model: Model) -> Self {
        CatalogEntry {
            id: model.id,
            name: model.name,
            category: model.category,
            description: model.description,
            tags: model.specialties,
            rating: model.rating,
            checked: model.checked,
            tenant_id: model.tenant_id,
            created_at: model.created_at,
            address: None,
            contact: None,
        }
    }
}
