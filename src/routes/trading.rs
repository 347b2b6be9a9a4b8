use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::ApiError;
use crate::filters::{BiddingFilter, NftTransactionFilter, ResourceFilter};
use crate::middleware::AuthUser;
use crate::models::{SoftDeletable, bidding, nft_transaction};
use crate::pagination::PageQuery;
use crate::serializers::trading::{BiddingCreate, NftTransactionCreate};
use crate::services::trading::TradingService;

use super::{created, detail_response, page_response};

/// POST /biddings - Placer une offre (offer_by = utilisateur connecté)
#[post("")]
pub async fn place_bid(
    auth_user: AuthUser,
    body: web::Json<BiddingCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let bid = TradingService::place_bid(db.get_ref(), body.into_inner(), auth_user.user_id).await?;
    created(db.get_ref(), bid).await
}

/// GET /biddings - Offres ouvertes, filtre `price` (PUBLIC)
#[get("")]
pub async fn list_biddings(
    filter: web::Query<BiddingFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(bidding::Entity::active()), &page).await
}

#[get("/{id}")]
pub async fn get_bidding(
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    detail_response::<bidding::Entity>(db.get_ref(), id.into_inner()).await
}

/// POST /nft-transactions - Enregistrer une vente
#[post("")]
pub async fn record_sale(
    _auth_user: AuthUser,
    body: web::Json<NftTransactionCreate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let sale = TradingService::record_sale(db.get_ref(), body.into_inner()).await?;
    created(db.get_ref(), sale).await
}

/// GET /nft-transactions - Ventes, filtres `buyer` et `start_date` (PUBLIC)
#[get("")]
pub async fn list_sales(
    filter: web::Query<NftTransactionFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(nft_transaction::Entity::active()), &page).await
}

#[get("/{id}")]
pub async fn get_sale(
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    detail_response::<nft_transaction::Entity>(db.get_ref(), id.into_inner()).await
}

pub fn trading_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/biddings")
            .service(place_bid)
            .service(list_biddings)
            .service(get_bidding)
    )
    .service(
        web::scope("/nft-transactions")
            .service(record_sale)
            .service(list_sales)
            .service(get_sale)
    );
}

#[cfg(test)]
mod tests {
    use crate::models::{Lifecycle, users};
    use crate::test_support::{bearer, bid, count_row, nft, test_app, transaction_log, user};
    use actix_web::{http::StatusCode, test};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_bidding_price_filter() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_row(1)])
            .append_query_results([vec![bid(2, 1, 3, 250)]])
            .append_query_results([vec![nft(1, 5)]])
            .append_query_results([vec![user(3)]])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get()
            .uri("/api/biddings?price=250")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_items"], 1);
        assert_eq!(body["items"][0]["price"], 250.0);
        assert_eq!(body["items"][0]["nft"], "NFT 1");
        assert_eq!(body["items"][0]["offer_by"], "First3 Last3");
        assert_eq!(body["items"][0]["status"], true);
    }

    #[actix_web::test]
    async fn test_bidding_price_must_be_numeric() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get()
            .uri("/api/biddings?price=abc")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_sale_recording_requires_login() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/api/nft-transactions")
            .set_json(serde_json::json!({"nft": 1, "buyer": 2, "seller": 3, "wallet": 1, "price": 10}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_removed_user_token_cannot_bid() {
        let mut removed = user(3);
        removed.lifecycle = Lifecycle::Removed;
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<users::Model>::new()])
                .into_connection(),
        );
        let app = test_app!(db.clone()).await;

        let req = test::TestRequest::post()
            .uri("/api/biddings")
            .insert_header(bearer(&removed))
            .set_json(serde_json::json!({"nft": 1, "price": 250}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let log = transaction_log(&db);
        assert_eq!(log.len(), 1);
        assert!(!format!("{:?}", log).contains("INSERT"));
    }
}
