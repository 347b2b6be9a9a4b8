use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Represent, label, not_blank, required_text, user_names};
use crate::models::{profile, users};

// ============================================================================
// SORTIE
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub is_removed: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<users::Model> for UserOut {
    fn from(user: users::Model) -> Self {
        UserOut {
            id: user.id,
            is_active: user.lifecycle.is_active(),
            is_removed: user.lifecycle.is_removed(),
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            date_joined: user.date_joined,
        }
    }
}

#[async_trait(?Send)]
impl Represent for users::Model {
    type Output = UserOut;

    async fn represent_all(
        _db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<UserOut>, DbErr> {
        Ok(rows.into_iter().map(UserOut::from).collect())
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileOut {
    pub id: i32,
    pub user: String,
    pub about: Option<String>,
    pub profile_image: Option<String>,
    pub banner_image: Option<String>,
    pub vine_link: Option<String>,
    pub facebook_link: Option<String>,
    pub twitter_link: Option<String>,
    pub google_plus_link: Option<String>,
    pub is_removed: bool,
}

impl ProfileOut {
    pub fn new(profile: profile::Model, user: String) -> Self {
        ProfileOut {
            id: profile.id,
            user,
            is_removed: profile.lifecycle.is_removed(),
            about: profile.about,
            profile_image: profile.profile_image,
            banner_image: profile.banner_image,
            vine_link: profile.vine_link,
            facebook_link: profile.facebook_link,
            twitter_link: profile.twitter_link,
            google_plus_link: profile.google_plus_link,
        }
    }
}

#[async_trait(?Send)]
impl Represent for profile::Model {
    type Output = ProfileOut;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<ProfileOut>, DbErr> {
        let users = user_names(db, rows.iter().map(|p| p.user_id)).await?;
        Ok(rows
            .into_iter()
            .map(|p| {
                let user = label(&users, p.user_id);
                ProfileOut::new(p, user)
            })
            .collect())
    }
}

/// Réponse de POST /profiles : le compte et son profil
#[derive(Debug, Serialize)]
pub struct AccountOut {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub user_profile: ProfileOut,
}

impl AccountOut {
    pub fn new(user: users::Model, profile: profile::Model) -> Self {
        let user_profile = ProfileOut::new(profile, user.full_name());
        AccountOut {
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            user_profile,
        }
    }
}

/// Ligne de GET /users/profiles et /nfts/top-sellers
#[derive(Debug, Serialize, PartialEq)]
pub struct PublicProfile {
    pub user_name: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OwnedNft {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// GET /users/{id}/nfts
#[derive(Debug, Serialize)]
pub struct UserNftData {
    pub user_name: String,
    pub user_email: String,
    pub profile_image: Option<String>,
    pub banner_image: Option<String>,
    pub nfts: Vec<OwnedNft>,
}

// ============================================================================
// ENTRÉE
// ============================================================================

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(
        custom(function = "required_text"),
        length(max = 150, message = "Ensure this field has no more than 150 characters.")
    )]
    pub username: String,
    #[validate(length(min = 8, message = "Ensure this field has at least 8 characters."))]
    pub password: String,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: String,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PasswordResetRequest {
    #[validate(custom(function = "required_text"))]
    pub password: String,
}

/// Champs modifiables d'un profil (PUT /profiles/{id})
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileUpdate {
    pub about: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub profile_image: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub banner_image: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub vine_link: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub facebook_link: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub twitter_link: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub google_plus_link: Option<String>,
}

impl ProfileUpdate {
    /// Applique les champs présents, les autres gardent leur valeur
    pub fn apply(self, profile: &mut profile::ActiveModel) {
        use sea_orm::Set;

        if let Some(about) = self.about {
            profile.about = Set(Some(about));
        }
        if let Some(image) = self.profile_image {
            profile.profile_image = Set(Some(image));
        }
        if let Some(image) = self.banner_image {
            profile.banner_image = Set(Some(image));
        }
        if let Some(link) = self.vine_link {
            profile.vine_link = Set(Some(link));
        }
        if let Some(link) = self.facebook_link {
            profile.facebook_link = Set(Some(link));
        }
        if let Some(link) = self.twitter_link {
            profile.twitter_link = Set(Some(link));
        }
        if let Some(link) = self.google_plus_link {
            profile.google_plus_link = Set(Some(link));
        }
    }
}

/// POST /profiles : profil de l'utilisateur connecté + ses noms
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct OwnProfileRequest {
    #[validate(custom(function = "not_blank"))]
    pub username: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: ProfileUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializers::field_errors;
    use crate::test_support::{profile, user};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_password_hash_never_rendered() {
        let out = serde_json::to_value(UserOut::from(user(1))).unwrap();
        assert!(out.get("password_hash").is_none());
        assert_eq!(out["is_active"], true);
        assert_eq!(out["is_removed"], false);
    }

    #[tokio::test]
    async fn test_profile_user_is_labelled() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(4)]])
            .into_connection();

        let out = profile::Model::represent(&db, profile(1, 4)).await.unwrap();
        assert_eq!(out.user, "First4 Last4");
    }

    #[test]
    fn test_register_validation() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"email": "nope", "password": "short"}"#).unwrap();
        let errors = field_errors(&request);

        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
        assert_eq!(errors.get("username").unwrap()[0], "This field is required.");
    }

    #[test]
    fn test_own_profile_request_reads_flat_body() {
        let request: OwnProfileRequest = serde_json::from_str(
            r#"{"first_name": "Ada", "about": "hi", "twitter_link": "not a url"}"#,
        )
        .unwrap();

        assert_eq!(request.first_name.as_deref(), Some("Ada"));
        assert_eq!(request.profile.about.as_deref(), Some("hi"));
        assert!(field_errors(&request).get("twitter_link").is_some());
    }
}
