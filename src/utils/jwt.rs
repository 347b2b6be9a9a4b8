use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

use crate::models::users;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub username: String,
    pub is_staff: bool,     // accès aux routes admin de l'API
    pub is_superuser: bool, // accès au panel /admin_site
    pub exp: i64,        // expiration timestamp
}

/// Génère un JWT token pour un utilisateur
pub fn generate_token(user: &users::Model, secret: &str, ttl_hours: i64) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        is_staff: user.is_staff,
        is_superuser: user.is_superuser,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un JWT token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::user;

    #[test]
    fn test_generate_and_verify_token() {
        let mut admin = user(123);
        admin.is_staff = true;

        let token = generate_token(&admin, "secret", 1).unwrap();
        let claims = verify_token(&token, "secret").unwrap();

        assert_eq!(claims.sub, 123);
        assert_eq!(claims.username, admin.username);
        assert!(claims.is_staff);
        assert!(!claims.is_superuser);
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here", "secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_token(&user(1), "secret", 1).unwrap();
        assert!(verify_token(&token, "another-secret").is_err());
    }
}
