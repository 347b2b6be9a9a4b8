use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::lifecycle::{Lifecycle, Listable, SoftDeletable};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub is_resolved: bool,
    pub resolved_by: Option<i32>, // NULL tant que personne n'a traité le message
    pub lifecycle: Lifecycle,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ResolvedBy",
        to = "super::users::Column::Id"
    )]
    ResolvedBy,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResolvedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Listable for Entity {
    const LABEL: &'static str = "Contact";

    fn id_column() -> Column {
        Column::Id
    }
}

impl SoftDeletable for Entity {
    fn lifecycle_column() -> Column {
        Column::Lifecycle
    }
}
