use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::lifecycle::{Lifecycle, Listable, SoftDeletable};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faqs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category_id: i32,
    pub updated_by: i32, // dernier admin ayant écrit la FAQ
    pub lifecycle: Lifecycle,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UpdatedBy",
        to = "super::users::Column::Id"
    )]
    UpdatedBy,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UpdatedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Listable for Entity {
    const LABEL: &'static str = "FAQ";

    fn id_column() -> Column {
        Column::Id
    }
}

impl SoftDeletable for Entity {
    fn lifecycle_column() -> Column {
        Column::Lifecycle
    }
}
