use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::lifecycle::{Lifecycle, Listable, SoftDeletable};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    pub lifecycle: Lifecycle,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::collection::Entity")]
    Collection,

    #[sea_orm(has_many = "super::faq::Entity")]
    Faq,
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl Related<super::faq::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faq.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Listable for Entity {
    const LABEL: &'static str = "Category";

    fn id_column() -> Column {
        Column::Id
    }
}

impl SoftDeletable for Entity {
    fn lifecycle_column() -> Column {
        Column::Lifecycle
    }
}
