use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, QueryFilter, QueryTrait, Select};
use serde::Deserialize;

use super::{ResourceFilter, empty_as_none};
use crate::models::{bidding, nft_transaction};

#[derive(Debug, Default, Deserialize)]
pub struct BiddingFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub price: Option<Decimal>,
}

impl ResourceFilter<bidding::Entity> for BiddingFilter {
    fn apply(&self, select: Select<bidding::Entity>) -> Select<bidding::Entity> {
        select.apply_if(self.price, |q, v| q.filter(bidding::Column::Price.eq(v)))
    }
}

/// `start_date` (YYYY-MM-DD) : ventes à partir de ce jour 00:00 UTC inclus
#[derive(Debug, Default, Deserialize)]
pub struct NftTransactionFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub buyer: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start_date: Option<NaiveDate>,
}

impl ResourceFilter<nft_transaction::Entity> for NftTransactionFilter {
    fn apply(&self, select: Select<nft_transaction::Entity>) -> Select<nft_transaction::Entity> {
        let lower_bound = self
            .start_date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc());

        select
            .apply_if(self.buyer, |q, v| q.filter(nft_transaction::Column::BuyerId.eq(v)))
            .apply_if(lower_bound, |q, v| {
                q.filter(nft_transaction::Column::SoldDate.gte(v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::sql;
    use actix_web::web::Query;
    use sea_orm::EntityTrait;

    #[test]
    fn test_bidding_price_is_exact_match() {
        let filter = Query::<BiddingFilter>::from_query("price=100").unwrap();
        let query = sql(filter.apply(bidding::Entity::find()));
        assert!(query.contains(r#""biddings"."price" = 100"#));
    }

    #[test]
    fn test_absent_price_matches_unfiltered_query() {
        let filter = Query::<BiddingFilter>::from_query("").unwrap();
        assert_eq!(
            sql(filter.apply(bidding::Entity::find())),
            sql(bidding::Entity::find())
        );
    }

    #[test]
    fn test_invalid_price_is_rejected() {
        assert!(Query::<BiddingFilter>::from_query("price=abc").is_err());
    }

    #[test]
    fn test_start_date_is_lower_bound() {
        let filter =
            Query::<NftTransactionFilter>::from_query("buyer=3&start_date=2022-01-15").unwrap();
        let query = sql(filter.apply(nft_transaction::Entity::find()));

        assert!(query.contains(r#""nft_transactions"."buyer_id" = 3"#));
        assert!(query.contains(r#""nft_transactions"."sold_date" >= '2022-01-15 00:00:00"#));
    }
}
