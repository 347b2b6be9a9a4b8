// ============================================================================
// ACCÈS AU PANEL ADMIN (/admin_site)
// ============================================================================
//
// Description:
//   Extracteur PanelAdmin : superuser obligatoire. Le JWT est lu dans le
//   cookie `admin_session` (posé par POST /admin_site/login), ou à défaut
//   dans le header Authorization.
//
// Points d'attention:
//   - Tout refus = 302 vers /admin_site/login, jamais de 401/403 ici
//   - Le superuser est relu en BD (compte actif, is_superuser courant)
//   - Le handler n'est pas exécuté : seule la lecture du compte touche la BD
//
// ============================================================================

use actix_web::http::header::LOCATION;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload};
use futures::future::LocalBoxFuture;

use super::auth::{AuthUser, bearer_token};
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "admin_session";
pub const LOGIN_PATH: &str = "/admin_site/login";

/// Superuser connecté au panel
#[derive(Debug, Clone)]
pub struct PanelAdmin(pub AuthUser);

impl PanelAdmin {
    async fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
        let token = match req.cookie(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => bearer_token(req)?.to_string(),
        };
        let user = AuthUser::from_token(req, &token).await?;

        if !user.is_superuser {
            log::warn!("User {} refused on panel route {}", user.user_id, req.path());
            return Err(ApiError::Forbidden);
        }
        Ok(user)
    }
}

/// Redirection vers la page de login du panel
pub fn login_redirect() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, LOGIN_PATH))
        .finish()
}

impl FromRequest for PanelAdmin {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match Self::authenticate(&req).await {
                Ok(user) => Ok(PanelAdmin(user)),
                Err(_) => {
                    Err(actix_web::error::InternalError::from_response("", login_redirect()).into())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::test_support::{bearer, staff, superuser, token, transaction_log};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn request(db: Arc<DatabaseConnection>) -> TestRequest {
        TestRequest::default()
            .app_data(web::Data::new(AppConfig::for_tests()))
            .app_data(web::Data::from(db))
    }

    fn store(rows: Vec<crate::models::users::Model>) -> Arc<DatabaseConnection> {
        Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        )
    }

    fn redirect_of(err: Error) -> (StatusCode, Option<String>) {
        let response = err.error_response();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        (response.status(), location)
    }

    #[actix_web::test]
    async fn test_anonymous_is_redirected() {
        let db = store(Vec::new());
        let req = request(db.clone()).to_http_request();
        let err = PanelAdmin::extract(&req).await.unwrap_err();

        assert_eq!(redirect_of(err), (StatusCode::FOUND, Some(LOGIN_PATH.to_string())));
        assert!(transaction_log(&db).is_empty());
    }

    #[actix_web::test]
    async fn test_staff_without_superuser_is_redirected() {
        let req = request(store(vec![staff(2)]))
            .insert_header(bearer(&staff(2)))
            .to_http_request();
        let err = PanelAdmin::extract(&req).await.unwrap_err();
        assert_eq!(redirect_of(err).0, StatusCode::FOUND);
    }

    #[actix_web::test]
    async fn test_demoted_superuser_loses_the_panel() {
        let req = request(store(vec![staff(1)]))
            .cookie(Cookie::new(SESSION_COOKIE, token(&superuser(1))))
            .to_http_request();
        let err = PanelAdmin::extract(&req).await.unwrap_err();
        assert_eq!(redirect_of(err).0, StatusCode::FOUND);
    }

    #[actix_web::test]
    async fn test_session_cookie_is_accepted() {
        let req = request(store(vec![superuser(1)]))
            .cookie(Cookie::new(SESSION_COOKIE, token(&superuser(1))))
            .to_http_request();
        let PanelAdmin(admin) = PanelAdmin::extract(&req).await.unwrap();
        assert_eq!(admin.user_id, 1);
    }
}
