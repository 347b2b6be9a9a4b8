use actix_web::{delete, get, post, route, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::ApiError;
use crate::filters::{ContactFilter, FaqFilter, ResourceFilter};
use crate::middleware::AdminUser;
use crate::models::{SoftDeletable, contact, faq};
use crate::pagination::PageQuery;
use crate::serializers::site::{ContactCreate, ContactUpdate, FaqCreate, FaqUpdate};
use crate::services::lifecycle::LifecycleService;
use crate::services::site::SiteService;

use super::{created, deleted, detail_response, message, page_response, represented};

// ============================================================================
// FAQ
// ============================================================================

#[get("")]
pub async fn list_faqs(
    filter: web::Query<FaqFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(faq::Entity::active()), &page).await
}

#[get("/{id}")]
pub async fn get_faq(
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    detail_response::<faq::Entity>(db.get_ref(), id.into_inner()).await
}

/// POST /faqs - updated_by = admin connecté
#[post("")]
pub async fn create_faq(
    admin: AdminUser,
    body: web::Json<FaqCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let AdminUser(user) = admin;
    let faq = SiteService::create_faq(db.get_ref(), body.into_inner(), user.user_id).await?;
    created(db.get_ref(), faq).await
}

#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_faq(
    admin: AdminUser,
    id: web::Path<i32>,
    body: web::Json<FaqUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let AdminUser(user) = admin;
    let faq =
        SiteService::update_faq(db.get_ref(), id.into_inner(), body.into_inner(), user.user_id)
            .await?;
    Ok(HttpResponse::Ok().json(represented(db.get_ref(), faq).await?))
}

#[delete("/{id}")]
pub async fn delete_faq(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<faq::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(deleted::<faq::Entity>())
}

// ============================================================================
// CONTACT
// ============================================================================

/// POST /contacts - Formulaire de contact (PUBLIC)
#[post("")]
pub async fn submit_contact(
    body: web::Json<ContactCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let contact = SiteService::submit_contact(db.get_ref(), body.into_inner()).await?;
    created(db.get_ref(), contact).await
}

#[get("")]
pub async fn list_contacts(
    _admin: AdminUser,
    filter: web::Query<ContactFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(contact::Entity::active()), &page).await
}

#[get("/{id}")]
pub async fn get_contact(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    detail_response::<contact::Entity>(db.get_ref(), id.into_inner()).await
}

#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_contact(
    _admin: AdminUser,
    id: web::Path<i32>,
    body: web::Json<ContactUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let contact =
        SiteService::update_contact(db.get_ref(), id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(represented(db.get_ref(), contact).await?))
}

#[delete("/{id}")]
pub async fn delete_contact(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<contact::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(deleted::<contact::Entity>())
}

/// POST /contacts/{id}/resolve - resolved_by = admin connecté
#[post("/{id}/resolve")]
pub async fn resolve_contact(
    admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let AdminUser(user) = admin;
    SiteService::resolve_contact(db.get_ref(), id.into_inner(), user.user_id).await?;
    Ok(message("Contact resolved successfully"))
}

pub fn site_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/faqs")
            .service(list_faqs)
            .service(get_faq)
            .service(create_faq)
            .service(update_faq)
            .service(delete_faq)
    )
    .service(
        web::scope("/contacts")
            .service(submit_contact)
            .service(list_contacts)
            .service(get_contact)
            .service(update_contact)
            .service(delete_contact)
            .service(resolve_contact)
    );
}

#[cfg(test)]
mod tests {
    use crate::test_support::{
        bearer, contact, count_row, signed_in, staff, test_app, transaction_log, user,
    };
    use actix_web::{http::StatusCode, test};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_contact_submission_is_public() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![contact(1)]])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(serde_json::json!({
                "name": "Jane",
                "email": "jane@example.com",
                "message": "Hello"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["is_resolved"], false);
        assert!(body["resolved_by"].is_null());
    }

    #[actix_web::test]
    async fn test_contact_list_is_admin_only() {
        let db = Arc::new(signed_in(&user(5)).into_connection());
        let app = test_app!(db.clone()).await;

        let req = test::TestRequest::get()
            .uri("/api/contacts")
            .insert_header(bearer(&user(5)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let log = transaction_log(&db);
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log[0]).contains("FROM \\\"users\\\""));
    }

    #[actix_web::test]
    async fn test_faq_create_rejects_missing_fields() {
        let db = signed_in(&staff(1))
            .append_query_results([count_row(0)])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/api/faqs")
            .insert_header(bearer(&staff(1)))
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["title"][0], "This field is required.");
        assert_eq!(body["category"][0], "Invalid pk \"0\" - object does not exist.");
    }
}
