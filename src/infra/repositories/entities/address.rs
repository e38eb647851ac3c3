//! Address database entity for SeaORM.
//!
//! An address belongs to exactly one workshop or one rectifier; the two
//! owner columns are mutually exclusive and each carries a unique index.

use sea_orm::entity::prelude::*;

use crate::domain::Address;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub street: Option<String>,
    pub district: String,
    pub province: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
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

impl From<Model> for Address {
    fn from(model: Model) -> Self {
        Address {
            id: model.id,
            street: model.street,
            district: model.district,
            province: model.province,
            country: model.country,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}
