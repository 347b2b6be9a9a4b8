use chrono::Utc;
use sea_orm::*;

use crate::error::ApiError;
use crate::models::{Lifecycle, bidding, nft, nft_transaction, users, wallet};
use crate::serializers::trading::{BiddingCreate, NftTransactionCreate};
use crate::serializers::{check_reference, field_errors};

pub struct TradingService;

impl TradingService {
    /// Nouvelle offre ouverte ; `offer_by` vient du token
    pub async fn place_bid(
        db: &DatabaseConnection,
        payload: BiddingCreate,
        offer_by: i32,
    ) -> Result<bidding::Model, ApiError> {
        let mut errors = field_errors(&payload);
        check_reference::<nft::Entity, _>(db, "nft", payload.nft, &mut errors).await?;
        errors.into_result()?;

        let bid = bidding::ActiveModel {
            nft_id: Set(payload.nft),
            offer_by: Set(offer_by),
            price: Set(payload.price),
            lifecycle: Set(Lifecycle::Active),
            bidding_date: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        log::info!("Bid {} placed on NFT {} by user {}", bid.id, bid.nft_id, offer_by);
        Ok(bid)
    }

    /// Enregistre une vente ; vérifications et insertion dans une transaction
    pub async fn record_sale(
        db: &DatabaseConnection,
        payload: NftTransactionCreate,
    ) -> Result<nft_transaction::Model, ApiError> {
        let txn = db.begin().await?;

        // 1. Toutes les références doivent exister
        let mut errors = field_errors(&payload);
        check_reference::<nft::Entity, _>(&txn, "nft", payload.nft, &mut errors).await?;
        check_reference::<users::Entity, _>(&txn, "buyer", payload.buyer, &mut errors).await?;
        check_reference::<users::Entity, _>(&txn, "seller", payload.seller, &mut errors).await?;
        check_reference::<wallet::Entity, _>(&txn, "wallet", payload.wallet, &mut errors).await?;
        if payload.buyer != 0 && payload.buyer == payload.seller {
            errors.add("buyer", "Buyer and seller must be different users.");
        }
        errors.into_result()?;

        // 2. Insérer la vente
        let sale = nft_transaction::ActiveModel {
            nft_id: Set(payload.nft),
            buyer_id: Set(payload.buyer),
            seller_id: Set(payload.seller),
            wallet_id: Set(payload.wallet),
            price: Set(payload.price),
            sold_date: Set(Utc::now()),
            lifecycle: Set(Lifecycle::Active),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "NFT {} sold by user {} to user {} for {}",
            sale.nft_id,
            sale.seller_id,
            sale.buyer_id,
            sale.price
        );
        Ok(sale)
    }
}
