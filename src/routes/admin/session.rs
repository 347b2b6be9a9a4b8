use actix_web::cookie::{Cookie, SameSite};
use actix_web::{get, post, web, HttpResponse};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

use super::{PANEL_ROOT, see_other};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::{PanelAdmin, SESSION_COOKIE};
use crate::models::{
    bidding, category, collection, contact, faq, nft, nft_transaction, reported_nft, users, wallet,
};
use crate::serializers::accounts::LoginRequest;
use crate::services::accounts::AccountService;
use crate::utils::jwt;

#[derive(Serialize)]
pub struct DashboardCounts {
    pub users: u64,
    pub nfts: u64,
    pub collections: u64,
    pub categories: u64,
    pub biddings: u64,
    pub nft_transactions: u64,
    pub wallets: u64,
    pub unresolved_reports: u64,
    pub unresolved_contacts: u64,
    pub faqs: u64,
}

fn session_cookie(value: String, config: &AppConfig) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, value)
        .path(PANEL_ROOT)
        .http_only(true)
        .secure(config.session_cookie_secure)
        .same_site(SameSite::Lax)
        .finish()
}

/// GET /admin_site/login - Champs attendus par le formulaire
#[get("/login")]
pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "fields": ["username", "password"],
        "action": format!("{}/login", PANEL_ROOT)
    }))
}

/// POST /admin_site/login - Ouvre une session panel (superuser seulement)
#[post("/login")]
pub async fn login(
    form: web::Form<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    // 1. Vérifier les identifiants
    let user = AccountService::authenticate(db.get_ref(), &form.username, &form.password).await?;

    // 2. Le panel est réservé aux superusers
    if !user.is_superuser {
        log::warn!("User {} refused on panel login", user.id);
        return Err(ApiError::Forbidden);
    }

    // 3. Le JWT devient le cookie de session
    let token = jwt::generate_token(&user, &config.jwt_secret, config.jwt_ttl_hours)
        .map_err(ApiError::Internal)?;
    log::info!("Panel session opened for user {}", user.id);

    let mut response = see_other("/dashboard");
    response
        .add_cookie(&session_cookie(token, &config))
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(response)
}

#[post("/logout")]
pub async fn logout(
    PanelAdmin(admin): PanelAdmin,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let mut cookie = session_cookie(String::new(), &config);
    cookie.make_removal();

    log::info!("Panel session closed for user {}", admin.user_id);
    let mut response = see_other("/login");
    response
        .add_cookie(&cookie)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(response)
}

/// GET /admin_site/dashboard - Compteurs par ressource
#[get("/dashboard")]
pub async fn dashboard(
    _admin: PanelAdmin,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let db = db.get_ref();

    let counts = DashboardCounts {
        users: users::Entity::find().count(db).await?,
        nfts: nft::Entity::find().count(db).await?,
        collections: collection::Entity::find().count(db).await?,
        categories: category::Entity::find().count(db).await?,
        biddings: bidding::Entity::find().count(db).await?,
        nft_transactions: nft_transaction::Entity::find().count(db).await?,
        wallets: wallet::Entity::find().count(db).await?,
        unresolved_reports: reported_nft::Entity::find()
            .filter(reported_nft::Column::IsResolved.eq(false))
            .count(db)
            .await?,
        unresolved_contacts: contact::Entity::find()
            .filter(contact::Column::IsResolved.eq(false))
            .count(db)
            .await?,
        faqs: faq::Entity::find().count(db).await?,
    };

    Ok(HttpResponse::Ok().json(counts))
}

pub fn session_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login_page)
        .service(login)
        .service(logout)
        .service(dashboard);
}
