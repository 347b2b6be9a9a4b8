// ============================================================================
// ERREURS API
// ============================================================================
//
// Description:
//   Hiérarchie d'erreurs typée retournée par les services et les routes.
//   Implémente ResponseError : chaque variante choisit son code HTTP et son
//   corps JSON.
//
// Points d'attention:
//   - Les erreurs 5xx sont loggées côté serveur avec le détail complet, le
//     client ne reçoit que {"message": "Internal server error"}
//   - Les erreurs de validation sont indexées par champ :
//     {"name": ["This field is required."], "collection": ["..."]}
//
// ============================================================================

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Erreurs de validation par champ (aucune écriture n'a lieu si non vide)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Erreur sur un seul champ
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Clé étrangère inexistante (même message que côté Python)
    pub fn missing_reference(&mut self, field: &str, id: i32) {
        self.add(field, format!("Invalid pk \"{}\" - object does not exist.", id));
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }

    /// Ok(()) si aucune erreur, sinon ApiError::Validation
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        use validator::ValidationErrorsKind;

        let mut fields = FieldErrors::new();
        for (field, kind) in errors.into_errors() {
            match kind {
                ValidationErrorsKind::Field(field_errors) => {
                    for error in field_errors {
                        let message = error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                        fields.add(field.as_ref(), message);
                    }
                }
                // Structure imbriquée (serde(flatten)) : mêmes clés qu'à plat
                ValidationErrorsKind::Struct(nested) => fields.merge((*nested).into()),
                ValidationErrorsKind::List(items) => {
                    for (_, nested) in items {
                        fields.merge((*nested).into());
                    }
                }
            }
        }
        fields
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} does not exist")]
    NotFound(&'static str),

    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("identity service error: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            ApiError::Validation(fields) => HttpResponse::build(status).json(fields),
            ApiError::Database(_) | ApiError::Upstream(_) | ApiError::Internal(_) => {
                log::error!("{}", self);
                HttpResponse::build(status).json(serde_json::json!({
                    "message": "Internal server error"
                }))
            }
            _ => HttpResponse::build(status).json(serde_json::json!({
                "message": self.to_string()
            })),
        }
    }
}

/// Handler commun pour les erreurs de désérialisation (Json, Form, Query)
pub fn payload_error(message: String) -> actix_web::Error {
    log::debug!("Rejected payload: {}", message);
    actix_web::error::InternalError::from_response(
        "",
        HttpResponse::BadRequest().json(serde_json::json!({ "message": message })),
    )
    .into()
}
