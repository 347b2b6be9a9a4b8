// ============================================================================
// SERVICE D'IDENTITÉ EXTERNE
// ============================================================================
//
// Description:
//   Client HTTP vers le service qui gère l'activation des comptes et la
//   confirmation de reset password. Le backend ne fait que relayer.
//
// Points d'attention:
//   - Corps envoyés en form-urlencoded (uid, token, new_password)
//   - Le code HTTP amont est renvoyé tel quel au client
//   - Erreur réseau = ApiError::Upstream (502)
//
// ============================================================================

use reqwest::Client;
use serde::Serialize;

use crate::error::ApiError;

/// Réponse relayée : code HTTP amont + message à renvoyer
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub message: String,
}

#[derive(Serialize)]
struct ActivationForm<'a> {
    uid: &'a str,
    token: &'a str,
}

#[derive(Serialize)]
struct ResetConfirmForm<'a> {
    uid: &'a str,
    token: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: Client,
    base_url: String,
}

impl IdentityClient {
    pub fn new(base_url: &str) -> Self {
        IdentityClient {
            client: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn activate(&self, uid: &str, token: &str) -> Result<UpstreamReply, ApiError> {
        let response = self
            .client
            .post(self.endpoint("activation/"))
            .form(&ActivationForm { uid, token })
            .send()
            .await?;

        let status = response.status().as_u16();
        log::info!("Activation of uid {} answered {}", uid, status);

        Ok(UpstreamReply {
            status,
            message: activation_message(status).to_string(),
        })
    }

    /// Le corps de la réponse amont est relayé brut
    pub async fn reset_password_confirm(
        &self,
        uid: &str,
        token: &str,
        new_password: &str,
    ) -> Result<UpstreamReply, ApiError> {
        let response = self
            .client
            .post(self.endpoint("reset_password_confirm/"))
            .form(&ResetConfirmForm {
                uid,
                token,
                new_password,
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        let message = response.text().await?;
        log::info!("Password reset confirm for uid {} answered {}", uid, status);

        Ok(UpstreamReply { status, message })
    }
}

pub fn activation_message(status: u16) -> &'static str {
    match status {
        200 | 204 => "Account activate successfully",
        _ => "Account activation failed",
    }
}
