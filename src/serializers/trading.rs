use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Represent, decimal_to_f64, label, nft_names, positive, user_names, wallet_addresses};
use crate::models::{bidding, nft_transaction};

#[derive(Debug, Serialize)]
pub struct BiddingOut {
    pub id: i32,
    pub nft: String,
    pub offer_by: String,
    pub price: f64,
    /// true = offre ouverte
    pub status: bool,
    pub is_removed: bool,
    pub bidding_date: DateTime<Utc>,
}

#[async_trait(?Send)]
impl Represent for bidding::Model {
    type Output = BiddingOut;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<BiddingOut>, DbErr> {
        let nfts = nft_names(db, rows.iter().map(|b| b.nft_id)).await?;
        let bidders = user_names(db, rows.iter().map(|b| b.offer_by)).await?;

        Ok(rows
            .into_iter()
            .map(|b| BiddingOut {
                id: b.id,
                nft: label(&nfts, b.nft_id),
                offer_by: label(&bidders, b.offer_by),
                price: decimal_to_f64(b.price),
                status: b.lifecycle.is_active(),
                is_removed: b.lifecycle.is_removed(),
                bidding_date: b.bidding_date,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
pub struct NftTransactionOut {
    pub id: i32,
    pub nft: String,
    pub buyer: String,
    pub seller: String,
    pub wallet: String,
    pub price: f64,
    pub sold_date: DateTime<Utc>,
    pub is_removed: bool,
}

#[async_trait(?Send)]
impl Represent for nft_transaction::Model {
    type Output = NftTransactionOut;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<NftTransactionOut>, DbErr> {
        let nfts = nft_names(db, rows.iter().map(|t| t.nft_id)).await?;
        // acheteurs et vendeurs : une seule requête users
        let users = user_names(db, rows.iter().flat_map(|t| [t.buyer_id, t.seller_id])).await?;
        let wallets = wallet_addresses(db, rows.iter().map(|t| t.wallet_id)).await?;

        Ok(rows
            .into_iter()
            .map(|t| NftTransactionOut {
                id: t.id,
                nft: label(&nfts, t.nft_id),
                buyer: label(&users, t.buyer_id),
                seller: label(&users, t.seller_id),
                wallet: label(&wallets, t.wallet_id),
                price: decimal_to_f64(t.price),
                sold_date: t.sold_date,
                is_removed: t.lifecycle.is_removed(),
            })
            .collect())
    }
}

/// `offer_by` vient du token : une valeur envoyée par le client est ignorée
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct BiddingCreate {
    pub nft: i32,
    #[validate(custom(function = "positive"))]
    pub price: Decimal,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NftTransactionCreate {
    pub nft: i32,
    pub buyer: i32,
    pub seller: i32,
    pub wallet: i32,
    #[validate(custom(function = "positive"))]
    pub price: Decimal,
}
