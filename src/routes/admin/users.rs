use actix_web::{get, post, web, HttpResponse};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::see_other;
use crate::error::ApiError;
use crate::filters::{ProfileFilter, ResourceFilter, UserFilter};
use crate::middleware::PanelAdmin;
use crate::models::{profile, users};
use crate::pagination::PageQuery;
use crate::routes::{page_response, represented};
use crate::services::lifecycle::LifecycleService;

/// GET /admin_site/home - Tous les comptes
#[get("/home")]
pub async fn list_users(
    _admin: PanelAdmin,
    filter: web::Query<UserFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(users::Entity::find()), &page).await
}

/// POST /admin_site/delete/{id} - Désactive un compte
#[post("/delete/{id}")]
pub async fn deactivate_user(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<users::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(see_other("/home"))
}

#[get("/profiles")]
pub async fn list_profiles(
    _admin: PanelAdmin,
    filter: web::Query<ProfileFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(profile::Entity::find()), &page).await
}

/// GET /admin_site/profiles_view/{user_id} - Profil d'un utilisateur
#[get("/profiles_view/{user_id}")]
pub async fn view_profile(
    _admin: PanelAdmin,
    user_id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let profile = profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id.into_inner()))
        .one(db.get_ref())
        .await?
        .ok_or(ApiError::NotFound("Profile"))?;
    Ok(HttpResponse::Ok().json(represented(db.get_ref(), profile).await?))
}

#[post("/delete_profile/{id}")]
pub async fn delete_profile(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<profile::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(see_other("/profiles"))
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(deactivate_user)
        .service(list_profiles)
        .service(view_profile)
        .service(delete_profile);
}

#[cfg(test)]
mod tests {
    use crate::models::Lifecycle;
    use crate::test_support::{bearer, count_row, exec, signed_in, superuser, test_app, user};
    use actix_web::http::{StatusCode, header::LOCATION};
    use actix_web::test;

    #[actix_web::test]
    async fn test_panel_lists_removed_users_too() {
        let mut removed = user(2);
        removed.lifecycle = Lifecycle::Removed;
        let db = signed_in(&superuser(1))
            .append_query_results([count_row(2)])
            .append_query_results([vec![user(1), removed]])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get()
            .uri("/admin_site/home")
            .insert_header(bearer(&superuser(1)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_items"], 2);
        assert_eq!(body["items"][1]["is_active"], false);
    }

    #[actix_web::test]
    async fn test_deactivate_redirects_to_list() {
        let db = signed_in(&superuser(1))
            .append_exec_results([exec(1)])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/admin_site/delete/2")
            .insert_header(bearer(&superuser(1)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/admin_site/home");
    }
}
