use actix_web::{get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};

use super::see_other;
use crate::error::ApiError;
use crate::filters::{ResourceFilter, WalletFilter, WalletTransactionFilter};
use crate::middleware::PanelAdmin;
use crate::models::{wallet, wallet_transaction};
use crate::pagination::PageQuery;
use crate::routes::page_response;
use crate::services::lifecycle::LifecycleService;

#[get("/wallet")]
pub async fn list_wallets(
    _admin: PanelAdmin,
    filter: web::Query<WalletFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(wallet::Entity::find()), &page).await
}

#[post("/wallet/delete/{id}")]
pub async fn delete_wallet(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<wallet::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(see_other("/wallet"))
}

/// GET /admin_site/wallet_transaction - Journal complet, lecture seule
#[get("/wallet_transaction")]
pub async fn list_wallet_transactions(
    _admin: PanelAdmin,
    filter: web::Query<WalletTransactionFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(wallet_transaction::Entity::find()), &page).await
}

pub fn wallet_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_wallets)
        .service(delete_wallet)
        .service(list_wallet_transactions);
}
