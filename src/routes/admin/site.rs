use actix_web::{get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};

use super::see_other;
use crate::error::ApiError;
use crate::filters::{ContactFilter, FaqFilter, ResourceFilter};
use crate::middleware::PanelAdmin;
use crate::models::{contact, faq};
use crate::pagination::PageQuery;
use crate::routes::page_response;
use crate::serializers::site::{FaqCreate, FaqUpdate};
use crate::services::lifecycle::LifecycleService;
use crate::services::site::SiteService;

// ============================================================================
// CONTACT
// ============================================================================

#[get("/list_contact")]
pub async fn list_contacts(
    _admin: PanelAdmin,
    filter: web::Query<ContactFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(contact::Entity::find()), &page).await
}

#[post("/delete_contact/{id}")]
pub async fn delete_contact(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<contact::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(see_other("/list_contact"))
}

// ============================================================================
// FAQ
// ============================================================================

#[get("/list_faq")]
pub async fn list_faqs(
    _admin: PanelAdmin,
    filter: web::Query<FaqFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(faq::Entity::find()), &page).await
}

/// POST /admin_site/create_faq - updated_by = superuser de la session
#[post("/create_faq")]
pub async fn create_faq(
    PanelAdmin(admin): PanelAdmin,
    form: web::Form<FaqCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    SiteService::create_faq(db.get_ref(), form.into_inner(), admin.user_id).await?;
    Ok(see_other("/list_faq"))
}

#[post("/update_faq/{id}")]
pub async fn update_faq(
    PanelAdmin(admin): PanelAdmin,
    id: web::Path<i32>,
    form: web::Form<FaqUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    SiteService::update_faq(db.get_ref(), id.into_inner(), form.into_inner(), admin.user_id)
        .await?;
    Ok(see_other("/list_faq"))
}

#[post("/delete_faq/{id}")]
pub async fn delete_faq(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<faq::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(see_other("/list_faq"))
}

pub fn site_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_contacts)
        .service(delete_contact)
        .service(list_faqs)
        .service(create_faq)
        .service(update_faq)
        .service(delete_faq);
}

#[cfg(test)]
mod tests {
    use crate::test_support::{
        bearer, count_row, faq, signed_in, superuser, test_app, transaction_log,
    };
    use actix_web::http::{StatusCode, header::LOCATION};
    use actix_web::test;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_faq_form_records_session_user() {
        let db = Arc::new(
            signed_in(&superuser(9))
                .append_query_results([count_row(1)])
                .append_query_results([vec![faq(1, 9)]])
                .into_connection(),
        );
        let app = test_app!(db.clone()).await;

        let req = test::TestRequest::post()
            .uri("/admin_site/create_faq")
            .insert_header(bearer(&superuser(9)))
            .set_form([("title", "Fees"), ("description", "2.5%"), ("category", "1")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/admin_site/list_faq");

        let insert = transaction_log(&db)
            .iter()
            .map(|statement| format!("{:?}", statement))
            .find(|statement| statement.contains("INSERT"))
            .unwrap();
        assert!(insert.contains("faqs"));
        assert!(insert.contains("Int(Some(9))"));
    }
}
