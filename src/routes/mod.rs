// ============================================================================
// ROUTES
// ============================================================================
//
// Description:
//   /api        : API JSON (accès déclaré par extracteur sur chaque handler)
//   /admin_site : panel admin, formulaires en entrée, PanelAdmin partout
//
// Points d'attention:
//   - Les erreurs de désérialisation (Json, Form, Query) deviennent des 400
//     {"message": ...} via payload_error
//   - Les routes littérales (/nfts/top-sellers) sont enregistrées avant
//     les routes paramétrées (/nfts/{id})
//
// ============================================================================

pub mod account;
pub mod admin;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod site;
pub mod trading;
pub mod users;
pub mod wallet;

use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, Select};
use serde::Serialize;

use crate::error::{ApiError, payload_error};
use crate::models::Listable;
use crate::pagination::{PageQuery, paginate};
use crate::serializers::{Represent, represent_page};
use crate::services::lifecycle::LifecycleService;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| payload_error(err.to_string())),
    )
    .app_data(web::FormConfig::default().error_handler(|err, _req| payload_error(err.to_string())))
    .app_data(
        web::QueryConfig::default().error_handler(|err, _req| payload_error(err.to_string())),
    );

    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(account::account_routes)
            .configure(users::users_routes)
            .configure(catalog::catalog_routes)
            .configure(trading::trading_routes)
            .configure(wallet::wallet_routes)
            .configure(site::site_routes),
    );

    cfg.service(web::scope("/admin_site").configure(admin::admin_routes));
}

/// Page filtrée, triée par id puis représentée (libellés résolus)
pub async fn page_response<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    query: &PageQuery,
) -> Result<HttpResponse, ApiError>
where
    E: Listable,
    E::Model: Represent + Sync,
{
    let page = paginate(db, select, query.requested()).await?;
    let page = represent_page(db, page).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Détail par id, quel que soit le lifecycle
pub async fn detail_response<E>(db: &DatabaseConnection, id: i32) -> Result<HttpResponse, ApiError>
where
    E: Listable,
    E::Model: Represent,
{
    let row = LifecycleService::find_or_404::<E, _>(db, id).await?;
    represented(db, row).await.map(|out| HttpResponse::Ok().json(out))
}

pub async fn represented<M: Represent>(
    db: &DatabaseConnection,
    row: M,
) -> Result<M::Output, ApiError> {
    Ok(M::represent(db, row).await?)
}

/// 201 + représentation de la ligne créée
pub async fn created<M: Represent>(db: &DatabaseConnection, row: M) -> Result<HttpResponse, ApiError> {
    let out = represented(db, row).await?;
    Ok(HttpResponse::Created().json(out))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn message(text: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: text.into(),
    })
}

/// {"message": "NFT deleted successfully"}
pub fn deleted<E: Listable>() -> HttpResponse {
    message(format!("{} deleted successfully", E::LABEL))
}
