use sea_orm::{ColumnTrait, QueryFilter, QueryTrait, Select};
use serde::Deserialize;

use super::{ResourceFilter, empty_as_none, flag};
use crate::models::{
    Lifecycle, category, collection, favourite_nft, nft, nft_price_history, reported_nft,
};

#[derive(Debug, Default, Deserialize)]
pub struct CollectionFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user: Option<i32>,
    #[serde(default, deserialize_with = "flag")]
    pub is_removed: Option<bool>,
}

impl ResourceFilter<collection::Entity> for CollectionFilter {
    fn apply(&self, select: Select<collection::Entity>) -> Select<collection::Entity> {
        select
            .apply_if(self.name.clone(), |q, v| q.filter(collection::Column::Name.eq(v)))
            .apply_if(self.category, |q, v| q.filter(collection::Column::CategoryId.eq(v)))
            .apply_if(self.user, |q, v| q.filter(collection::Column::UserId.eq(v)))
            .apply_if(self.is_removed, |q, v| {
                q.filter(collection::Column::Lifecycle.eq(Lifecycle::from_removed_flag(v)))
            })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub is_removed: Option<bool>,
}

impl ResourceFilter<category::Entity> for CategoryFilter {
    fn apply(&self, select: Select<category::Entity>) -> Select<category::Entity> {
        select
            .apply_if(self.name.clone(), |q, v| q.filter(category::Column::Name.eq(v)))
            .apply_if(self.is_active, |q, v| q.filter(category::Column::IsActive.eq(v)))
            .apply_if(self.is_removed, |q, v| {
                q.filter(category::Column::Lifecycle.eq(Lifecycle::from_removed_flag(v)))
            })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FavouriteNftFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub nft: Option<i32>,
    #[serde(default, deserialize_with = "flag")]
    pub is_favorite: Option<bool>,
}

impl ResourceFilter<favourite_nft::Entity> for FavouriteNftFilter {
    fn apply(&self, select: Select<favourite_nft::Entity>) -> Select<favourite_nft::Entity> {
        select
            .apply_if(self.user, |q, v| q.filter(favourite_nft::Column::UserId.eq(v)))
            .apply_if(self.nft, |q, v| q.filter(favourite_nft::Column::NftId.eq(v)))
            .apply_if(self.is_favorite, |q, v| {
                q.filter(favourite_nft::Column::IsFavorite.eq(v))
            })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportedNftFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub nft: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub reporter: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub report_type: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_resolved: Option<bool>,
}

impl ResourceFilter<reported_nft::Entity> for ReportedNftFilter {
    fn apply(&self, select: Select<reported_nft::Entity>) -> Select<reported_nft::Entity> {
        select
            .apply_if(self.nft, |q, v| q.filter(reported_nft::Column::NftId.eq(v)))
            .apply_if(self.reporter, |q, v| q.filter(reported_nft::Column::ReporterId.eq(v)))
            .apply_if(self.report_type.clone(), |q, v| {
                q.filter(reported_nft::Column::ReportType.eq(v))
            })
            .apply_if(self.is_resolved, |q, v| {
                q.filter(reported_nft::Column::IsResolved.eq(v))
            })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PriceHistoryFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub nft: Option<i32>,
}

impl ResourceFilter<nft_price_history::Entity> for PriceHistoryFilter {
    fn apply(
        &self,
        select: Select<nft_price_history::Entity>,
    ) -> Select<nft_price_history::Entity> {
        select.apply_if(self.nft, |q, v| q.filter(nft_price_history::Column::NftId.eq(v)))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NftFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
}

impl ResourceFilter<nft::Entity> for NftFilter {
    fn apply(&self, select: Select<nft::Entity>) -> Select<nft::Entity> {
        select.apply_if(self.name.clone(), |q, v| q.filter(nft::Column::Name.eq(v)))
    }
}
