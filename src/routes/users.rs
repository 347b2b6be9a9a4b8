use actix_web::{delete, get, post, route, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::ApiError;
use crate::filters::{ProfileFilter, ResourceFilter, UserFilter};
use crate::middleware::{AdminUser, AuthUser};
use crate::models::{SoftDeletable, profile, users};
use crate::pagination::PageQuery;
use crate::serializers::accounts::{AccountOut, OwnProfileRequest, ProfileUpdate};
use crate::services::accounts::AccountService;
use crate::services::lifecycle::LifecycleService;

use super::{deleted, detail_response, page_response, represented};

// ============================================================================
// PROFILS
// ============================================================================

/// POST /profiles - Créer ou compléter son propre profil
#[post("")]
pub async fn save_own_profile(
    auth_user: AuthUser,
    body: web::Json<OwnProfileRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let (user, profile) =
        AccountService::save_own_profile(db.get_ref(), auth_user.user_id, body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(AccountOut::new(user, profile)))
}

/// GET /profiles - Profils actifs (admin)
#[get("")]
pub async fn list_profiles(
    _admin: AdminUser,
    filter: web::Query<ProfileFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(profile::Entity::active()), &page).await
}

#[get("/{id}")]
pub async fn get_profile(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    detail_response::<profile::Entity>(db.get_ref(), id.into_inner()).await
}

#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_profile(
    _admin: AdminUser,
    id: web::Path<i32>,
    body: web::Json<ProfileUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let profile = AccountService::update_profile(db.get_ref(), id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(represented(db.get_ref(), profile).await?))
}

#[delete("/{id}")]
pub async fn delete_profile(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<profile::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(deleted::<profile::Entity>())
}

// ============================================================================
// UTILISATEURS
// ============================================================================

/// GET /users - Comptes actifs (admin)
#[get("")]
pub async fn list_users(
    _admin: AdminUser,
    filter: web::Query<UserFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(users::Entity::active()), &page).await
}

/// GET /users/profiles - Nom + image de chaque profil actif (PUBLIC)
#[get("/profiles")]
pub async fn public_profiles(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let profiles = AccountService::public_profiles(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(profiles))
}

/// GET /users/{id}/nfts - Profil et NFTs actifs d'un utilisateur (PUBLIC)
#[get("/{id}/nfts")]
pub async fn user_nfts(
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let user_data = AccountService::user_nfts(db.get_ref(), id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "user_data": user_data })))
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profiles")
            .service(save_own_profile)
            .service(list_profiles)
            .service(get_profile)
            .service(update_profile)
            .service(delete_profile)
    )
    .service(
        web::scope("/users")
            .service(list_users)
            .service(public_profiles)
            .service(user_nfts)
    );
}

#[cfg(test)]
mod tests {
    use crate::test_support::{
        bearer, count_row, profile, signed_in, staff, test_app, transaction_log, user,
    };
    use actix_web::{http::StatusCode, test};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_profile_list_is_admin_only() {
        let db = Arc::new(signed_in(&user(3)).into_connection());
        let app = test_app!(db.clone()).await;

        let req = test::TestRequest::get()
            .uri("/api/profiles")
            .insert_header(bearer(&user(3)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let log = transaction_log(&db);
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log[0]).contains("FROM \\\"users\\\""));
    }

    #[actix_web::test]
    async fn test_admin_lists_profiles() {
        let db = signed_in(&staff(1))
            .append_query_results([count_row(1)])
            .append_query_results([vec![profile(1, 2)]])
            .append_query_results([vec![user(2)]])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get()
            .uri("/api/profiles?page=abc")
            .insert_header(bearer(&staff(1)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["page"], 1);
        assert_eq!(body["total_items"], 1);
        assert_eq!(body["items"][0]["user"], "First2 Last2");
    }

    #[actix_web::test]
    async fn test_user_without_profile_has_no_nfts_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::models::profile::Model>::new()])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get().uri("/api/users/8/nfts").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
