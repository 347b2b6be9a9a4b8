// ============================================================================
// CONFIGURATION
// ============================================================================
//
// Description:
//   Chargée une seule fois au démarrage depuis l'environnement (.env accepté).
//   Partagée ensuite entre les workers via web::Data<AppConfig>.
//
// Variables:
//   - DATABASE_URL (obligatoire)
//   - JWT_SECRET (obligatoire)
//   - HOST / PORT (défaut 127.0.0.1:8080)
//   - JWT_TTL_HOURS (défaut 24)
//   - DB_MAX_CONNECTIONS (défaut 10)
//   - IDENTITY_SERVICE_URL (service externe d'activation / reset password)
//   - SESSION_COOKIE_SECURE (cookie admin_session en HTTPS seulement)
//
// ============================================================================

use std::env;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_IDENTITY_SERVICE_URL: &str =
    "https://nft-marketeplace-fkg7q.ondigitalocean.app/api/auth/users/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment or .env file")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub db_max_connections: u32,
    pub identity_service_url: String,
    pub session_cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed_or("PORT", 8080)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours: parsed_or("JWT_TTL_HOURS", 24)?,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 10)?,
            identity_service_url: env::var("IDENTITY_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_SERVICE_URL.to_string()),
            session_cookie_secure: parsed_or("SESSION_COOKIE_SECURE", false)?,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parsed_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl AppConfig {
    /// Configuration minimale pour les tests (pas de BD réelle)
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_hours: 1,
            db_max_connections: 1,
            identity_service_url: "http://127.0.0.1:9/api/auth/users/".to_string(),
            session_cookie_secure: false,
        }
    }
}
