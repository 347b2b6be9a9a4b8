use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::lifecycle::{Lifecycle, Listable, SoftDeletable};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "biddings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nft_id: i32,
    pub offer_by: i32,
    pub price: Decimal,
    pub lifecycle: Lifecycle, // Active = offre ouverte, Removed = offre fermée
    pub bidding_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::nft::Entity",
        from = "Column::NftId",
        to = "super::nft::Column::Id"
    )]
    Nft,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OfferBy",
        to = "super::users::Column::Id"
    )]
    OfferBy,
}

impl Related<super::nft::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Nft.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OfferBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Listable for Entity {
    const LABEL: &'static str = "Bidding";

    fn id_column() -> Column {
        Column::Id
    }
}

impl SoftDeletable for Entity {
    fn lifecycle_column() -> Column {
        Column::Lifecycle
    }
}
