// ============================================================================
// PANEL ADMIN (/admin_site)
// ============================================================================
//
// Description:
//   Même cycle de vie que l'API, mais pour les superusers seulement :
//   listes complètes (éléments supprimés inclus), formulaires en entrée,
//   pages JSON en sortie.
//
// Points d'attention:
//   - Chaque handler (sauf login) prend PanelAdmin : refus = 302 vers login
//   - Les mutations sont des POST ; succès = 303 vers la liste concernée
//   - Erreur de validation = 400 avec les erreurs par champ
//
// ============================================================================

pub mod catalog;
pub mod session;
pub mod site;
pub mod trading;
pub mod users;
pub mod wallet;

use actix_web::HttpResponse;
use actix_web::http::header::LOCATION;
use actix_web::web;

pub const PANEL_ROOT: &str = "/admin_site";

/// 303 See Other vers une page du panel (`list` sans le préfixe /admin_site)
pub fn see_other(list: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, format!("{}{}", PANEL_ROOT, list)))
        .finish()
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(session::session_routes)
        .configure(users::users_routes)
        .configure(catalog::catalog_routes)
        .configure(trading::trading_routes)
        .configure(wallet::wallet_routes)
        .configure(site::site_routes);
}

#[cfg(test)]
mod tests {
    use crate::test_support::{bearer, signed_in, staff, test_app, transaction_log, user};
    use actix_web::http::{StatusCode, header::LOCATION};
    use actix_web::test;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    async fn assert_redirects_to_login(uri: &str, method: test::TestRequest) {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let app = test_app!(db.clone()).await;

        let resp = test::call_service(&app, method.uri(uri).to_request()).await;

        assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/admin_site/login");
        assert!(transaction_log(&db).is_empty());
    }

    #[actix_web::test]
    async fn test_every_panel_page_requires_superuser() {
        for uri in [
            "/admin_site/dashboard",
            "/admin_site/home",
            "/admin_site/profiles",
            "/admin_site/list_reported_nft",
            "/admin_site/nfts_list",
            "/admin_site/nftprice-list",
            "/admin_site/bidding",
            "/admin_site/wallet_transaction",
            "/admin_site/list_faq",
        ] {
            assert_redirects_to_login(uri, test::TestRequest::get()).await;
        }
    }

    #[actix_web::test]
    async fn test_panel_mutations_require_superuser() {
        for uri in [
            "/admin_site/delete/1",
            "/admin_site/nfts_delete/1",
            "/admin_site/resolve_reported_nft/1",
            "/admin_site/wallet/delete/1",
        ] {
            assert_redirects_to_login(uri, test::TestRequest::post()).await;
        }
    }

    #[actix_web::test]
    async fn test_staff_is_not_enough_for_panel() {
        for caller in [user(2), staff(3)] {
            let db = Arc::new(signed_in(&caller).into_connection());
            let app = test_app!(db.clone()).await;

            let req = test::TestRequest::get()
                .uri("/admin_site/list_reported_nft")
                .insert_header(bearer(&caller))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FOUND);

            // Seule la lecture du compte a eu lieu
            let log = transaction_log(&db);
            assert_eq!(log.len(), 1);
            assert!(format!("{:?}", log[0]).contains("FROM \\\"users\\\""));
        }
    }
}
