// ============================================================================
// CATALOGUE SERVICE
// ============================================================================
//
// Description:
//   Écritures sur le catalogue : catégories, collections, NFTs, favoris,
//   signalements et historique des prix.
//
// Points d'attention:
//   - Un NFT créé est toujours caché (is_hidden = true) jusqu'à validation admin
//   - Changer le prix d'un NFT ajoute une ligne nft_price_history dans la
//     MÊME transaction que la mise à jour
//   - Les clés étrangères sont vérifiées avant toute écriture
//
// ============================================================================

use chrono::Utc;
use sea_orm::*;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::nft::SaleType;
use crate::models::{
    Lifecycle, category, collection, favourite_nft, nft, nft_price_history, reported_nft, users,
};
use crate::serializers::catalog::{
    CategoryCreate, CategoryUpdate, CollectionCreate, CollectionUpdate, FavouriteCreate, NftCreate,
    NftUpdate, PriceHistoryCreate, ReportCreate,
};
use crate::serializers::{check_optional_reference, check_reference, field_errors};
use crate::services::lifecycle::LifecycleService;

pub struct CatalogService;

impl CatalogService {
    pub async fn create_category(
        db: &DatabaseConnection,
        payload: CategoryCreate,
    ) -> Result<category::Model, ApiError> {
        field_errors(&payload).into_result()?;

        let category = category::ActiveModel {
            name: Set(payload.name),
            is_active: Set(true),
            lifecycle: Set(Lifecycle::Active),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(category)
    }

    pub async fn update_category(
        db: &DatabaseConnection,
        id: i32,
        update: CategoryUpdate,
    ) -> Result<category::Model, ApiError> {
        let category = LifecycleService::find_or_404::<category::Entity, _>(db, id).await?;
        field_errors(&update).into_result()?;

        let mut active: category::ActiveModel = category.into();
        update.apply(&mut active);
        Ok(active.update(db).await?)
    }

    /// `user_id` vient du token
    pub async fn create_collection(
        db: &DatabaseConnection,
        payload: CollectionCreate,
        user_id: i32,
    ) -> Result<collection::Model, ApiError> {
        let mut errors = field_errors(&payload);
        check_reference::<category::Entity, _>(db, "category", payload.category, &mut errors)
            .await?;
        errors.into_result()?;

        let now = Utc::now();
        let collection = collection::ActiveModel {
            name: Set(payload.name),
            description: Set(payload.description),
            category_id: Set(payload.category),
            user_id: Set(user_id),
            lifecycle: Set(Lifecycle::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(collection)
    }

    pub async fn update_collection(
        db: &DatabaseConnection,
        id: i32,
        update: CollectionUpdate,
    ) -> Result<collection::Model, ApiError> {
        let collection = LifecycleService::find_or_404::<collection::Entity, _>(db, id).await?;

        let mut errors = field_errors(&update);
        check_optional_reference::<category::Entity, _>(db, "category", update.category, &mut errors)
            .await?;
        errors.into_result()?;

        let mut active: collection::ActiveModel = collection.into();
        update.apply(&mut active);
        active.updated_at = Set(Utc::now());
        Ok(active.update(db).await?)
    }

    /// Création d'un NFT : caché, propriétaire imposé par l'appelant
    pub async fn create_nft(
        db: &DatabaseConnection,
        payload: NftCreate,
        owner_id: i32,
        sale_type: SaleType,
    ) -> Result<nft::Model, ApiError> {
        // 1. Valider le payload et les références
        let mut errors = field_errors(&payload);
        check_reference::<collection::Entity, _>(db, "collection", payload.collection, &mut errors)
            .await?;
        check_reference::<users::Entity, _>(db, "owner", owner_id, &mut errors).await?;
        errors.into_result()?;

        // 2. Insérer avec les valeurs imposées par le serveur
        let now = Utc::now();
        let nft = nft::ActiveModel {
            name: Set(payload.name),
            description: Set(payload.description),
            image: Set(payload.image),
            royalty: Set(payload.royalty),
            size: Set(payload.size),
            no_of_copies: Set(payload.no_of_copies),
            price: Set(payload.price),
            sale_type: Set(sale_type),
            total_views: Set(0),
            is_hidden: Set(true),
            is_put_on_sale: Set(false),
            collection_id: Set(payload.collection),
            owner_id: Set(owner_id),
            lifecycle: Set(Lifecycle::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        log::info!("NFT {} created by user {}", nft.id, owner_id);
        Ok(nft)
    }

    /// Mise à jour d'un NFT ; un nouveau prix est historisé dans la même transaction
    pub async fn update_nft(
        db: &DatabaseConnection,
        id: i32,
        update: NftUpdate,
    ) -> Result<nft::Model, ApiError> {
        let txn = db.begin().await?;

        // 1. Charger et valider
        let current = LifecycleService::find_or_404::<nft::Entity, _>(&txn, id).await?;
        let mut errors = field_errors(&update);
        check_optional_reference::<collection::Entity, _>(
            &txn,
            "collection",
            update.collection,
            &mut errors,
        )
        .await?;
        errors.into_result()?;

        // 2. Prix modifié ?
        let new_price = update.price.filter(|price| *price != current.price);

        let mut active: nft::ActiveModel = current.into();
        update.apply(&mut active);
        let now = Utc::now();
        if let Some(price) = new_price {
            active.price = Set(price);
        }
        active.updated_at = Set(now);
        let nft = active.update(&txn).await?;

        // 3. Historiser le nouveau prix
        if let Some(price) = new_price {
            nft_price_history::ActiveModel {
                nft_id: Set(nft.id),
                price: Set(price),
                date: Set(now),
                lifecycle: Set(Lifecycle::Active),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            log::info!("NFT {} repriced to {}", nft.id, price);
        }

        txn.commit().await?;
        Ok(nft)
    }

    /// Bascule is_hidden
    pub async fn toggle_visibility(db: &DatabaseConnection, id: i32) -> Result<nft::Model, ApiError> {
        let nft = LifecycleService::find_or_404::<nft::Entity, _>(db, id).await?;
        let hidden = !nft.is_hidden;

        LifecycleService::set_flag::<nft::Entity, _>(db, id, nft::Column::IsHidden, hidden).await?;

        Ok(nft::Model {
            is_hidden: hidden,
            ..nft
        })
    }

    pub async fn add_price(
        db: &DatabaseConnection,
        payload: PriceHistoryCreate,
    ) -> Result<nft_price_history::Model, ApiError> {
        let mut errors = field_errors(&payload);
        check_reference::<nft::Entity, _>(db, "nft", payload.nft, &mut errors).await?;
        errors.into_result()?;

        let entry = nft_price_history::ActiveModel {
            nft_id: Set(payload.nft),
            price: Set(payload.price),
            date: Set(Utc::now()),
            lifecycle: Set(Lifecycle::Active),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(entry)
    }

    /// `user_id` vient du token
    pub async fn add_favourite(
        db: &DatabaseConnection,
        payload: FavouriteCreate,
        user_id: i32,
    ) -> Result<favourite_nft::Model, ApiError> {
        let mut errors = field_errors(&payload);
        check_reference::<nft::Entity, _>(db, "nft", payload.nft, &mut errors).await?;
        errors.into_result()?;

        let favourite = favourite_nft::ActiveModel {
            user_id: Set(user_id),
            nft_id: Set(payload.nft),
            is_favorite: Set(payload.is_favorite),
            date: Set(Utc::now()),
            lifecycle: Set(Lifecycle::Active),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(favourite)
    }

    /// Seul l'auteur du favori (ou un admin) peut le retirer
    pub async fn remove_favourite(
        db: &DatabaseConnection,
        id: i32,
        caller: &AuthUser,
    ) -> Result<(), ApiError> {
        let favourite = LifecycleService::find_or_404::<favourite_nft::Entity, _>(db, id).await?;
        if !caller.can_manage(favourite.user_id) {
            return Err(ApiError::Forbidden);
        }
        LifecycleService::soft_delete::<favourite_nft::Entity, _>(db, id).await
    }

    /// `reporter_id` vient du token
    pub async fn report(
        db: &DatabaseConnection,
        payload: ReportCreate,
        reporter_id: i32,
    ) -> Result<reported_nft::Model, ApiError> {
        let mut errors = field_errors(&payload);
        check_reference::<nft::Entity, _>(db, "nft", payload.nft, &mut errors).await?;
        errors.into_result()?;

        let report = reported_nft::ActiveModel {
            nft_id: Set(payload.nft),
            reporter_id: Set(reporter_id),
            report_type: Set(payload.report_type),
            description: Set(payload.description),
            is_resolved: Set(false),
            lifecycle: Set(Lifecycle::Active),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        log::info!("NFT {} reported by user {}", report.nft_id, reporter_id);
        Ok(report)
    }

    pub async fn resolve_report(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
        LifecycleService::set_flag::<reported_nft::Entity, _>(
            db,
            id,
            reported_nft::Column::IsResolved,
            true,
        )
        .await
    }
}
