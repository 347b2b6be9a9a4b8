use actix_web::{get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};

use super::see_other;
use crate::error::ApiError;
use crate::filters::{BiddingFilter, NftTransactionFilter, ResourceFilter};
use crate::middleware::PanelAdmin;
use crate::models::{bidding, nft_transaction};
use crate::pagination::PageQuery;
use crate::routes::page_response;
use crate::services::lifecycle::LifecycleService;

/// GET /admin_site/bidding - Enchères ouvertes et clôturées
#[get("/bidding")]
pub async fn list_bids(
    _admin: PanelAdmin,
    filter: web::Query<BiddingFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(bidding::Entity::find()), &page).await
}

/// POST /admin_site/bidding/delete/{id} - Clôture l'enchère
#[post("/bidding/delete/{id}")]
pub async fn close_bid(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<bidding::Entity, _>(db.get_ref(), id.into_inner()).await?;
    Ok(see_other("/bidding"))
}

#[get("/nft_transaction")]
pub async fn list_sales(
    _admin: PanelAdmin,
    filter: web::Query<NftTransactionFilter>,
    page: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    page_response(db.get_ref(), filter.apply(nft_transaction::Entity::find()), &page).await
}

#[post("/nft_transaction/delete/{id}")]
pub async fn delete_sale(
    _admin: PanelAdmin,
    id: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    LifecycleService::soft_delete::<nft_transaction::Entity, _>(db.get_ref(), id.into_inner())
        .await?;
    Ok(see_other("/nft_transaction"))
}

pub fn trading_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_bids)
        .service(close_bid)
        .service(list_sales)
        .service(delete_sale);
}

#[cfg(test)]
mod tests {
    use crate::models::Lifecycle;
    use crate::test_support::{
        bearer, bid, count_row, exec, nft, signed_in, superuser, test_app, user,
    };
    use actix_web::http::{StatusCode, header::LOCATION};
    use actix_web::test;

    #[actix_web::test]
    async fn test_closed_bids_stay_visible_in_panel() {
        let mut closed = bid(2, 1, 4, 90);
        closed.lifecycle = Lifecycle::Removed;
        let db = signed_in(&superuser(1))
            .append_query_results([count_row(1)])
            .append_query_results([vec![closed]])
            .append_query_results([vec![nft(1, 7)]])
            .append_query_results([vec![user(4)]])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get()
            .uri("/admin_site/bidding")
            .insert_header(bearer(&superuser(1)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_items"], 1);
        assert_eq!(body["items"][0]["status"], false);
    }

    #[actix_web::test]
    async fn test_unknown_sale_is_not_found() {
        let db = signed_in(&superuser(1))
            .append_exec_results([exec(0)])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/admin_site/nft_transaction/delete/99")
            .insert_header(bearer(&superuser(1)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get(LOCATION).is_none());
    }
}
