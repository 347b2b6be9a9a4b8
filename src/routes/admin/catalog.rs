use actix_web::{get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};

use super::see_other;
use crate::error::ApiError;
use crate::filters::{
    CategoryFilter, CollectionFilter, FavouriteNftFilter, NftFilter, PriceHistoryFilter,
    ReportedNftFilter, ResourceFilter,
};
use crate::middleware::PanelAdmin;
use crate::models::{category, collection, favourite_nft, nft, nft_price_history, reported_nft};
use crate::pagination::PageQuery;
use crate::serializers::catalog::{
    CategoryCreate, CategoryUpdate, NftForm, NftUpdate, PriceHistoryCreate,
};
use crate::services::catalog::CatalogService;
use crate::services::lifecycle::LifecycleService;
use crate::routes::page_response;

// ============================================================================
// COLLECTIONS / CATÉGORIES
// ============================================================================

#[get("/list_collection")]
pub async fn list_collections(
    _admin: PanelAdmin,
    filter: web::Query<CollectionFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(collection::Entity::find()), &page).await
}

#[post("/delete_collection/{id}")]
pub async fn delete_collection(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<collection::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(see_other("/list_collection"))
}

#[get("/list_category")]
pub async fn list_categories(
    _admin: PanelAdmin,
    filter: web::Query<CategoryFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(category::Entity::find()), &page).await
}

#[post("/create_category")]
pub async fn create_category(
    _admin: PanelAdmin,
    form: web::Form<CategoryCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    CatalogService::create_category(db.get_ref(), form.into_inner()).await?;
    Ok(see_other("/list_category"))
}

#[post("/update_category/{id}")]
pub async fn update_category(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    form: web::Form<CategoryUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    CatalogService::update_category(db.get_ref(), id.into_inner(), form.into_inner()).await?;
    Ok(see_other("/list_category"))
}

#[post("/delete_category/{id}")]
pub async fn delete_category(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<category::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(see_other("/list_category"))
}

// ============================================================================
// FAVORIS / SIGNALEMENTS
// ============================================================================

#[get("/list_favorites_nft")]
pub async fn list_favourites(
    _admin: PanelAdmin,
    filter: web::Query<FavouriteNftFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(favourite_nft::Entity::find()), &page).await
}

#[post("/delete_favorites_nft/{id}")]
pub async fn delete_favourite(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<favourite_nft::Entity, _>(db.get_ref(), id.into_inner())
        .await?;
    Ok(see_other("/list_favorites_nft"))
}

/// GET /admin_site/list_reported_nft - Signalements résolus ou non
#[get("/list_reported_nft")]
pub async fn list_reports(
    _admin: PanelAdmin,
    filter: web::Query<ReportedNftFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(reported_nft::Entity::find()), &page).await
}

#[post("/resolve_reported_nft/{id}")]
pub async fn resolve_report(
    PanelAdmin(admin): PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    CatalogService::resolve_report(db.get_ref(), id).await?;
    log::info!("Report {} resolved from panel by user {}", id, admin.user_id);
    Ok(see_other("/list_reported_nft"))
}

// ============================================================================
// NFTS
// ============================================================================

#[get("/nfts_list")]
pub async fn list_nfts(
    _admin: PanelAdmin,
    filter: web::Query<NftFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(nft::Entity::find()), &page).await
}

/// POST /admin_site/nfts_create - L'admin choisit owner et sale_type
#[post("/nfts_create")]
pub async fn create_nft(
    _admin: PanelAdmin,
    form: web::Form<NftForm>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let (payload, owner, sale_type) = form.into_inner().split();
    CatalogService::create_nft(db.get_ref(), payload, owner, sale_type).await?;
    Ok(see_other("/nfts_list"))
}

#[post("/nfts_update/{id}")]
pub async fn update_nft(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    form: web::Form<NftUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    CatalogService::update_nft(db.get_ref(), id.into_inner(), form.into_inner()).await?;
    Ok(see_other("/nfts_list"))
}

#[post("/nfts_delete/{id}")]
pub async fn delete_nft(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<nft::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(see_other("/nfts_list"))
}

// ============================================================================
// HISTORIQUE DES PRIX
// ============================================================================

#[get("/nftprice-list")]
pub async fn list_prices(
    _admin: PanelAdmin,
    filter: web::Query<PriceHistoryFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(nft_price_history::Entity::find()), &page).await
}

#[post("/nftprice_history-add")]
pub async fn add_price(
    _admin: PanelAdmin,
    form: web::Form<PriceHistoryCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    CatalogService::add_price(db.get_ref(), form.into_inner()).await?;
    Ok(see_other("/nftprice-list"))
}

#[post("/nftprice_history-delete/{id}")]
pub async fn delete_price(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<nft_price_history::Entity, _>(db.get_ref(), id.into_inner())
        .await?;
    Ok(see_other("/nftprice-list"))
}

pub fn catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_collections)
        .service(delete_collection)
        .service(list_categories)
        .service(create_category)
        .service(update_category)
        .service(delete_category)
        .service(list_favourites)
        .service(delete_favourite)
        .service(list_reports)
        .service(resolve_report)
        .service(list_nfts)
        .service(create_nft)
        .service(update_nft)
        .service(delete_nft)
        .service(list_prices)
        .service(add_price)
        .service(delete_price);
}

#[cfg(test)]
mod tests {
    use crate::test_support::{
        bearer, category, count_row, exec, signed_in, superuser, test_app, transaction_log,
    };
    use actix_web::http::{StatusCode, header::LOCATION};
    use actix_web::test;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_category_form_redirects_to_list() {
        let db = signed_in(&superuser(1))
            .append_query_results([vec![category(4)]])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/admin_site/create_category")
            .insert_header(bearer(&superuser(1)))
            .set_form([("name", "Art")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/admin_site/list_category");
    }

    #[actix_web::test]
    async fn test_invalid_nft_form_returns_field_errors() {
        let db = signed_in(&superuser(1))
            .append_query_results([count_row(0)])
            .append_query_results([count_row(0)])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/admin_site/nfts_create")
            .insert_header(bearer(&superuser(1)))
            .set_form([("sale_type", "timed_auction"), ("price", "10")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["name"][0], "This field is required.");
        assert_eq!(body["owner"][0], "Invalid pk \"0\" - object does not exist.");
    }

    #[actix_web::test]
    async fn test_resolve_report_from_panel() {
        let db = Arc::new(
            signed_in(&superuser(1))
                .append_exec_results([exec(1)])
                .into_connection(),
        );
        let app = test_app!(db.clone()).await;

        let req = test::TestRequest::post()
            .uri("/admin_site/resolve_reported_nft/3")
            .insert_header(bearer(&superuser(1)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(LOCATION).unwrap(),
            "/admin_site/list_reported_nft"
        );
        let log = format!("{:?}", transaction_log(&db));
        assert!(log.contains("is_resolved"));
    }
}
