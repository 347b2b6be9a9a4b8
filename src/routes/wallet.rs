use actix_web::{delete, get, post, route, web, HttpResponse};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;

use crate::error::ApiError;
use crate::filters::{ResourceFilter, WalletFilter, WalletTransactionFilter};
use crate::middleware::{AdminUser, AuthUser};
use crate::models::{SoftDeletable, wallet, wallet_transaction};
use crate::pagination::PageQuery;
use crate::serializers::wallet::{
    WalletCreate, WalletOut, WalletTransactionCreate, WalletTransactionOut, WalletUpdate,
};
use crate::services::lifecycle::LifecycleService;
use crate::services::wallet_service::WalletService;

use super::{created, deleted, page_response, represented};

// Réponse d'un mouvement : le wallet à jour + la ligne de journal
#[derive(Serialize)]
pub struct MovementResponse {
    pub wallet: WalletOut,
    pub transaction: WalletTransactionOut,
}

/// Charge le wallet et vérifie que l'appelant peut le consulter
async fn owned_wallet(
    db: &DatabaseConnection,
    id: i32,
    caller: &AuthUser,
) -> Result<wallet::Model, ApiError> {
    let wallet = LifecycleService::find_or_404::<wallet::Entity, _>(db, id).await?;
    if !caller.can_manage(wallet.user_id) {
        return Err(ApiError::Forbidden);
    }
    Ok(wallet)
}

/// POST /api/wallets - Créer son wallet (un seul par utilisateur)
#[post("")]
pub async fn create_wallet(
    auth_user: AuthUser,
    body: web::Json<WalletCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let wallet = WalletService::create_wallet(db.get_ref(), body.into_inner(), auth_user.user_id).await?;
    created(db.get_ref(), wallet).await
}

/// GET /api/wallets - Wallets actifs (admin)
#[get("")]
pub async fn list_wallets(
    _admin: AdminUser,
    filter: web::Query<WalletFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(wallet::Entity::active()), &page).await
}

/// GET /api/wallets/{id} - Propriétaire ou admin
#[get("/{id}")]
pub async fn get_wallet(
    auth_user: AuthUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let wallet = owned_wallet(db.get_ref(), id.into_inner(), &auth_user).await?;
    Ok(HttpResponse::Ok().json(represented(db.get_ref(), wallet).await?))
}

/// PUT|PATCH /api/wallets/{id} - Adresse et drapeaux (le solde n'est jamais modifiable ici)
#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_wallet(
    _admin: AdminUser,
    id: web::Path<i32>,
    body: web::Json<WalletUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let wallet = WalletService::update_wallet(db.get_ref(), id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(represented(db.get_ref(), wallet).await?))
}

#[delete("/{id}")]
pub async fn delete_wallet(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<wallet::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(deleted::<wallet::Entity>())
}

/// POST /api/wallets/{id}/transactions - Mouvement atomique (propriétaire seulement)
#[post("/{id}/transactions")]
pub async fn add_transaction(
    auth_user: AuthUser,
    id: web::Path<i32>,
    body: web::Json<WalletTransactionCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();

    // 1. Seul le propriétaire peut mouvementer son wallet
    let wallet = LifecycleService::find_or_404::<wallet::Entity, _>(db.get_ref(), id).await?;
    if wallet.user_id != auth_user.user_id {
        return Err(ApiError::Forbidden);
    }

    // 2. Solde + journal dans une seule transaction BD
    let (wallet, entry) = WalletService::record_movement(db.get_ref(), id, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(MovementResponse {
        wallet: represented(db.get_ref(), wallet).await?,
        transaction: represented(db.get_ref(), entry).await?,
    }))
}

/// GET /api/wallets/{id}/transactions - Journal du wallet (propriétaire ou admin)
#[get("/{id}/transactions")]
pub async fn list_transactions(
    auth_user: AuthUser,
    id: web::Path<i32>,
    filter: web::Query<WalletTransactionFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let wallet = owned_wallet(db.get_ref(), id.into_inner(), &auth_user).await?;
    let select = filter
        .apply(wallet_transaction::Entity::find())
        .filter(wallet_transaction::Column::WalletId.eq(wallet.id));
    page_response(db.get_ref(), select, &page).await
}

pub fn wallet_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wallets")
            .service(create_wallet)
            .service(list_wallets)
            .service(get_wallet)
            .service(update_wallet)
            .service(delete_wallet)
            .service(add_transaction)
            .service(list_transactions)
    );
}
