use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::serializers::accounts::PasswordResetRequest;
use crate::serializers::field_errors;
use crate::services::identity::{IdentityClient, UpstreamReply};

#[derive(Deserialize)]
pub struct UidToken {
    pub uid: String,
    pub token: String,
}

#[derive(Serialize)]
struct ResetResponse {
    content: String,
}

/// Le code amont est renvoyé tel quel (502 s'il n'est pas un code HTTP valide)
fn mirrored(reply: &UpstreamReply) -> StatusCode {
    StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// GET /account/activate/{uid}/{token} - Activation via le service d'identité
#[get("/activate/{uid}/{token}")]
pub async fn activate(
    path: web::Path<UidToken>,
    identity: web::Data<IdentityClient>,
) -> Result<HttpResponse, ApiError> {
    let reply = identity.activate(&path.uid, &path.token).await?;
    Ok(HttpResponse::build(mirrored(&reply)).json(serde_json::json!({
        "message": reply.message
    })))
}

/// POST /account/password/reset/confirm/{uid}/{token} - Nouveau mot de passe
#[post("/password/reset/confirm/{uid}/{token}")]
pub async fn reset_password_confirm(
    path: web::Path<UidToken>,
    body: web::Json<PasswordResetRequest>,
    identity: web::Data<IdentityClient>,
) -> Result<HttpResponse, ApiError> {
    // 1. Valider avant tout appel externe
    field_errors(&*body).into_result()?;

    // 2. Relayer au service d'identité
    let reply = identity
        .reset_password_confirm(&path.uid, &path.token, &body.password)
        .await?;

    Ok(HttpResponse::build(mirrored(&reply)).json(ResetResponse {
        content: reply.message,
    }))
}

pub fn account_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/account")
            .service(activate)
            .service(reset_password_confirm)
    );
}
