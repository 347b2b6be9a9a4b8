use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{SoftDeletable, users};
use crate::utils::jwt;

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl From<users::Model> for AuthUser {
    fn from(user: users::Model) -> Self {
        AuthUser {
            user_id: user.id,
            username: user.username,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}

impl AuthUser {
    /// Propriétaire de la ressource ou admin
    pub fn can_manage(&self, owner_id: i32) -> bool {
        self.user_id == owner_id || self.is_staff
    }

    /// Décode le JWT puis recharge le compte : rôles et état viennent de la BD, pas du token
    pub async fn from_token(req: &HttpRequest, token: &str) -> Result<Self, ApiError> {
        // 1. Signature et expiration
        let config = req
            .app_data::<web::Data<AppConfig>>()
            .ok_or_else(|| ApiError::Internal("AppConfig is not registered".to_string()))?;

        let claims = jwt::verify_token(token, &config.jwt_secret).map_err(|e| {
            log::warn!("Rejected token on {}: {}", req.path(), e);
            ApiError::Unauthorized(e)
        })?;

        // 2. Le compte doit toujours exister et être actif
        let db = req
            .app_data::<web::Data<DatabaseConnection>>()
            .ok_or_else(|| ApiError::Internal("DatabaseConnection is not registered".to_string()))?;

        let user = users::Entity::active()
            .filter(users::Column::Id.eq(claims.sub))
            .one(db.get_ref())
            .await?
            .ok_or_else(|| {
                log::warn!("Token of missing or deactivated user {} on {}", claims.sub, req.path());
                ApiError::Unauthorized("User not found or deactivated.".to_string())
            })?;

        Ok(AuthUser::from(user))
    }
}

/// Token du header `Authorization: Bearer <token>`
pub fn bearer_token(req: &HttpRequest) -> Result<&str, ApiError> {
    // 1. Extraire le header Authorization
    let header = req.headers().get(AUTHORIZATION).ok_or_else(|| {
        ApiError::Unauthorized("Authentication credentials were not provided.".to_string())
    })?;

    // 2. Convertir le header en string
    let auth_str = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    // 3. Extraire le token (format: "Bearer <token>")
    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized("Invalid Authorization format (expected: Bearer <token>)".to_string())
    })
}

/// Implémentation de FromRequest pour AuthUser
/// Cela permet à Actix-Web d'extraire automatiquement AuthUser des requêtes
impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let token = bearer_token(&req)?.to_string();
            AuthUser::from_token(&req, &token).await
        })
    }
}

/// Utilisateur authentifié avec is_staff (routes admin de l'API)
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let user = AuthUser::from_request(&req, payload);
        Box::pin(async move {
            let user = user.await?;
            if !user.is_staff {
                log::warn!("User {} refused on admin route {}", user.user_id, req.path());
                return Err(ApiError::Forbidden);
            }
            Ok(AdminUser(user))
        })
    }
}
