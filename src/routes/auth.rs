use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::users;
use crate::serializers::accounts::{LoginRequest, RegisterRequest, UserOut};
use crate::services::accounts::AccountService;
use crate::utils::jwt;

// Réponse après login/register
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserOut,
}

// Réponse pour /auth/me
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: i32,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

fn issue_token(user: users::Model, config: &AppConfig) -> Result<AuthResponse, ApiError> {
    let token = jwt::generate_token(&user, &config.jwt_secret, config.jwt_ttl_hours)
        .map_err(ApiError::Internal)?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// POST /auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    // 1. Valider et créer l'utilisateur (aucun rôle)
    let user = AccountService::register(db.get_ref(), body.into_inner()).await?;

    // 2. Générer le JWT
    Ok(HttpResponse::Created().json(issue_token(user, &config)?))
}

/// POST /auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let user = AccountService::authenticate(db.get_ref(), &body.username, &body.password).await?;
    Ok(HttpResponse::Ok().json(issue_token(user, &config)?))
}

/// GET /auth/me - Vérifier le token (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        user_id: auth_user.user_id,
        username: auth_user.username,
        is_staff: auth_user.is_staff,
        is_superuser: auth_user.is_superuser,
    })
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(me)
    );
}

#[cfg(test)]
mod tests {
    use crate::test_support::{bearer, count_row, signed_in, staff, test_app, user};
    use actix_web::{http::StatusCode, test};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[actix_web::test]
    async fn test_me_requires_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_me_returns_roles() {
        let db = signed_in(&staff(9)).into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&staff(9)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["user_id"], 9);
        assert_eq!(body["is_staff"], true);
        assert_eq!(body["is_superuser"], false);
    }

    #[actix_web::test]
    async fn test_me_reflects_revoked_staff_role() {
        // Token émis avant la révocation du rôle
        let db = signed_in(&user(9)).into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&staff(9)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["user_id"], 9);
        assert_eq!(body["is_staff"], false);
    }

    #[actix_web::test]
    async fn test_register_rejects_invalid_payload() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_row(0), count_row(0)])
            .into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({"email": "not-an-email", "username": "", "password": "short"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body.get("email").is_some());
        assert!(body.get("password").is_some());
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body.get("message").is_some());
    }
}
