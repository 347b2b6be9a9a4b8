use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::lifecycle::{Lifecycle, Listable, SoftDeletable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    #[default]
    #[sea_orm(string_value = "fixed_price")]
    FixedPrice,
    #[sea_orm(string_value = "timed_auction")]
    TimedAuction,
    #[sea_orm(string_value = "open_for_bids")]
    OpenForBids,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nfts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub royalty: Decimal,      // pourcentage reversé au créateur
    pub size: Option<String>,
    pub no_of_copies: i32,
    pub price: Decimal,
    pub sale_type: SaleType,
    pub total_views: i32,
    pub is_hidden: bool,       // true à la création, basculé par un admin
    pub is_put_on_sale: bool,
    pub collection_id: i32,
    pub owner_id: i32,
    pub lifecycle: Lifecycle,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collection::Entity",
        from = "Column::CollectionId",
        to = "super::collection::Column::Id"
    )]
    Collection,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,

    #[sea_orm(has_many = "super::nft_price_history::Entity")]
    PriceHistory,

    #[sea_orm(has_many = "super::bidding::Entity")]
    Bidding,
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::nft_price_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceHistory.def()
    }
}

impl Related<super::bidding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bidding.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Listable for Entity {
    const LABEL: &'static str = "NFT";

    fn id_column() -> Column {
        Column::Id
    }
}

impl SoftDeletable for Entity {
    fn lifecycle_column() -> Column {
        Column::Lifecycle
    }
}
