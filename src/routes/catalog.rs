// ============================================================================
// ROUTES CATALOGUE : NFTs, collections, catégories, favoris, signalements
// ============================================================================

use actix_web::{delete, get, post, route, web, HttpResponse};
use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter};

use crate::error::ApiError;
use crate::filters::{
    CategoryFilter, CollectionFilter, FavouriteNftFilter, NftFilter, ReportedNftFilter,
    ResourceFilter,
};
use crate::middleware::{AdminUser, AuthUser};
use crate::models::nft::SaleType;
use crate::models::{
    SoftDeletable, category, collection, favourite_nft, nft, nft_price_history, reported_nft,
};
use crate::pagination::PageQuery;
use crate::serializers::catalog::{
    CategoryCreate, CategoryUpdate, CollectionCreate, CollectionUpdate, FavouriteCreate, NftCreate,
    NftUpdate, ReportCreate,
};
use crate::services::accounts::AccountService;
use crate::services::catalog::CatalogService;
use crate::services::lifecycle::LifecycleService;

use super::{created, deleted, detail_response, message, page_response, represented};

// ============================================================================
// NFTS
// ============================================================================

/// POST /nfts - Créer un NFT (caché jusqu'à validation admin)
#[post("")]
pub async fn create_nft(
    auth_user: AuthUser,
    body: web::Json<NftCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let nft = CatalogService::create_nft(
        db.get_ref(),
        body.into_inner(),
        auth_user.user_id,
        SaleType::default(),
    )
    .await?;
    created(db.get_ref(), nft).await
}

/// GET /nfts - NFTs actifs (PUBLIC)
#[get("")]
pub async fn list_nfts(
    filter: web::Query<NftFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(nft::Entity::active()), &page).await
}

/// GET /nfts/top-sellers - Propriétaires par prix décroissant (PUBLIC)
#[get("/top-sellers")]
pub async fn top_sellers(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let sellers = AccountService::top_sellers(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(sellers))
}

#[get("/{id}")]
pub async fn get_nft(
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    detail_response::<nft::Entity>(db.get_ref(), id.into_inner()).await
}

/// PUT|PATCH /nfts/{id} - Mise à jour (un nouveau prix est historisé)
#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_nft(
    _admin: AdminUser,
    id: web::Path<i32>,
    body: web::Json<NftUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let nft = CatalogService::update_nft(db.get_ref(), id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(represented(db.get_ref(), nft).await?))
}

#[delete("/{id}")]
pub async fn delete_nft(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<nft::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(deleted::<nft::Entity>())
}

/// POST /nfts/{id}/visibility - Bascule is_hidden
#[post("/{id}/visibility")]
pub async fn toggle_visibility(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let nft = CatalogService::toggle_visibility(db.get_ref(), id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(represented(db.get_ref(), nft).await?))
}

/// GET /nfts/{id}/price-history - Historique des prix d'un NFT (PUBLIC)
#[get("/{id}/price-history")]
pub async fn price_history(
    id: web::Path<i32>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let nft = LifecycleService::find_or_404::<nft::Entity, _>(db.get_ref(), id.into_inner()).await?;
    let select = nft_price_history::Entity::active()
        .filter(nft_price_history::Column::NftId.eq(nft.id));
    page_response(db.get_ref(), select, &page).await
}

// ============================================================================
// COLLECTIONS
// ============================================================================

#[post("")]
pub async fn create_collection(
    admin: AdminUser,
    body: web::Json<CollectionCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let AdminUser(user) = admin;
    let collection =
        CatalogService::create_collection(db.get_ref(), body.into_inner(), user.user_id).await?;
    created(db.get_ref(), collection).await
}

#[get("")]
pub async fn list_collections(
    filter: web::Query<CollectionFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(collection::Entity::active()), &page).await
}

#[get("/{id}")]
pub async fn get_collection(
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    detail_response::<collection::Entity>(db.get_ref(), id.into_inner()).await
}

#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_collection(
    _admin: AdminUser,
    id: web::Path<i32>,
    body: web::Json<CollectionUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let collection =
        CatalogService::update_collection(db.get_ref(), id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(represented(db.get_ref(), collection).await?))
}

#[delete("/{id}")]
pub async fn delete_collection(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<collection::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(deleted::<collection::Entity>())
}

// ============================================================================
// CATÉGORIES
// ============================================================================

#[post("")]
pub async fn create_category(
    _admin: AdminUser,
    body: web::Json<CategoryCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let category = CatalogService::create_category(db.get_ref(), body.into_inner()).await?;
    created(db.get_ref(), category).await
}

#[get("")]
pub async fn list_categories(
    filter: web::Query<CategoryFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(category::Entity::active()), &page).await
}

#[get("/{id}")]
pub async fn get_category(
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    detail_response::<category::Entity>(db.get_ref(), id.into_inner()).await
}

#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_category(
    _admin: AdminUser,
    id: web::Path<i32>,
    body: web::Json<CategoryUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let category =
        CatalogService::update_category(db.get_ref(), id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(represented(db.get_ref(), category).await?))
}

#[delete("/{id}")]
pub async fn delete_category(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<category::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(deleted::<category::Entity>())
}

// ============================================================================
// FAVORIS
// ============================================================================

#[post("")]
pub async fn add_favourite(
    auth_user: AuthUser,
    body: web::Json<FavouriteCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let favourite =
        CatalogService::add_favourite(db.get_ref(), body.into_inner(), auth_user.user_id).await?;
    created(db.get_ref(), favourite).await
}

/// GET /favourites - Favoris actifs de l'utilisateur connecté
#[get("")]
pub async fn list_favourites(
    auth_user: AuthUser,
    filter: web::Query<FavouriteNftFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let select = filter
        .apply(favourite_nft::Entity::active())
        .filter(favourite_nft::Column::UserId.eq(auth_user.user_id));
    page_response(db.get_ref(), select, &page).await
}

#[delete("/{id}")]
pub async fn remove_favourite(
    auth_user: AuthUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    CatalogService::remove_favourite(db.get_ref(), id.into_inner(), &auth_user).await?;
    Ok(deleted::<favourite_nft::Entity>())
}

// ============================================================================
// SIGNALEMENTS
// ============================================================================

#[post("")]
pub async fn report_nft(
    auth_user: AuthUser,
    body: web::Json<ReportCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let report = CatalogService::report(db.get_ref(), body.into_inner(), auth_user.user_id).await?;
    created(db.get_ref(), report).await
}

/// GET /reports - Signalements actifs non résolus (admin)
#[get("")]
pub async fn list_reports(
    _admin: AdminUser,
    filter: web::Query<ReportedNftFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let select = filter
        .apply(reported_nft::Entity::active())
        .filter(reported_nft::Column::IsResolved.eq(false));
    page_response(db.get_ref(), select, &page).await
}

#[get("/{id}")]
pub async fn get_report(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    detail_response::<reported_nft::Entity>(db.get_ref(), id.into_inner()).await
}

#[delete("/{id}")]
pub async fn delete_report(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<reported_nft::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(deleted::<reported_nft::Entity>())
}

#[post("/{id}/resolve")]
pub async fn resolve_report(
    _admin: AdminUser,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    CatalogService::resolve_report(db.get_ref(), id.into_inner()).await?;
    Ok(message("Reported NFT resolved successfully"))
}

pub fn catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/nfts")
            .service(create_nft)
            .service(list_nfts)
            .service(top_sellers)
            .service(get_nft)
            .service(update_nft)
            .service(delete_nft)
            .service(toggle_visibility)
            .service(price_history)
    )
    .service(
        web::scope("/collections")
            .service(create_collection)
            .service(list_collections)
            .service(get_collection)
            .service(update_collection)
            .service(delete_collection)
    )
    .service(
        web::scope("/categories")
            .service(create_category)
            .service(list_categories)
            .service(get_category)
            .service(update_category)
            .service(delete_category)
    )
    .service(
        web::scope("/favourites")
            .service(add_favourite)
            .service(list_favourites)
            .service(remove_favourite)
    )
    .service(
        web::scope("/reports")
            .service(report_nft)
            .service(list_reports)
            .service(get_report)
            .service(delete_report)
            .service(resolve_report)
    );
}

#[cfg(test)]
mod tests {
    use crate::models::{Lifecycle, nft as nft_entity};
    use crate::test_support::{
        bearer, category, collection, count_row, exec, nft, signed_in, staff, test_app,
        transaction_log, user,
    };
    use actix_web::{http::StatusCode, test};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_unknown_nft_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<nft_entity::Model>::new()])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get().uri("/api/nfts/404").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "NFT does not exist");
    }

    #[actix_web::test]
    async fn test_soft_deleted_nft_detail_still_readable() {
        let mut removed = nft(3, 2);
        removed.lifecycle = Lifecycle::Removed;
        let db = signed_in(&staff(1))
            .append_exec_results([exec(1)])
            .append_query_results([vec![removed]])
            .append_query_results([vec![collection(1, 2)]])
            .append_query_results([vec![user(2)]])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::delete()
            .uri("/api/nfts/3")
            .insert_header(bearer(&staff(1)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "NFT deleted successfully");

        let req = test::TestRequest::get().uri("/api/nfts/3").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["is_removed"], true);
        assert_eq!(body["collection"], "Collection 1");
        assert_eq!(body["owner"], "First2 Last2");
    }

    #[actix_web::test]
    async fn test_created_nft_is_hidden_and_owned_by_caller() {
        let db = signed_in(&user(4))
            .append_query_results([count_row(1)])
            .append_query_results([count_row(1)])
            .append_query_results([vec![nft(10, 4)]])
            .append_query_results([vec![collection(1, 4)]])
            .append_query_results([vec![user(4)]])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/api/nfts")
            .insert_header(bearer(&user(4)))
            .set_json(serde_json::json!({
                "name": "NFT 10",
                "royalty": 5,
                "price": 100,
                "collection": 1,
                "owner": 99,
                "is_hidden": false
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["is_hidden"], true);
        assert_eq!(body["owner"], "First4 Last4");
    }

    #[actix_web::test]
    async fn test_non_staff_cannot_update_nft() {
        let db = Arc::new(signed_in(&user(2)).into_connection());
        let app = test_app!(db.clone()).await;

        let req = test::TestRequest::patch()
            .uri("/api/nfts/1")
            .insert_header(bearer(&user(2)))
            .set_json(serde_json::json!({"price": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let log = transaction_log(&db);
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log[0]).contains("FROM \\\"users\\\""));
    }

    #[actix_web::test]
    async fn test_anonymous_cannot_create_nft() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/api/nfts")
            .set_json(serde_json::json!({"name": "x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_top_sellers_is_not_an_nft_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<nft_entity::Model>::new()])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get().uri("/api/nfts/top-sellers").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_category_list_rejects_bad_flag() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get()
            .uri("/api/categories?is_active=maybe")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_category_list_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_row(2)])
            .append_query_results([vec![category(1), category(2)]])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get()
            .uri("/api/categories?page=0&name=")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["page"], 1);
        assert_eq!(body["items"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(body["has_next"], false);
    }
}
