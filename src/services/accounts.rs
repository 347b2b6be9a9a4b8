use chrono::Utc;
use sea_orm::*;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::models::{Lifecycle, SoftDeletable, nft, profile, users};
use crate::serializers::accounts::{
    OwnProfileRequest, OwnedNft, ProfileUpdate, PublicProfile, RegisterRequest, UserNftData,
};
use crate::serializers::field_errors;
use crate::services::lifecycle::LifecycleService;
use crate::utils::password;

pub struct AccountService;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

impl AccountService {
    /// Crée un compte sans aucun rôle (is_staff / is_superuser à false)
    pub async fn register(
        db: &DatabaseConnection,
        request: RegisterRequest,
    ) -> Result<users::Model, ApiError> {
        // 1. Valider le payload
        let mut errors = field_errors(&request);

        // 2. Unicité du username et de l'email
        let username_taken = users::Entity::find()
            .filter(users::Column::Username.eq(&request.username))
            .count(db)
            .await?
            > 0;
        if username_taken {
            errors.add("username", USERNAME_TAKEN);
        }

        let email_taken = users::Entity::find()
            .filter(users::Column::Email.eq(&request.email))
            .count(db)
            .await?
            > 0;
        if email_taken {
            errors.add("email", "A user with that email already exists.");
        }
        errors.into_result()?;

        // 3. Hash le mot de passe
        let password_hash = password::hash_password(&request.password).map_err(ApiError::Internal)?;

        // 4. Créer l'utilisateur
        let user = users::ActiveModel {
            email: Set(request.email),
            username: Set(request.username),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            password_hash: Set(password_hash),
            is_staff: Set(false),
            is_superuser: Set(false),
            lifecycle: Set(Lifecycle::Active),
            date_joined: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        log::info!("User {} registered", user.id);
        Ok(user)
    }

    /// Vérifie username / mot de passe ; un compte désactivé ne peut pas se connecter
    pub async fn authenticate(
        db: &DatabaseConnection,
        username: &str,
        password_attempt: &str,
    ) -> Result<users::Model, ApiError> {
        let rejected = || {
            log::warn!("Rejected login for '{}'", username);
            ApiError::Unauthorized("Invalid username or password".to_string())
        };

        let user = users::Entity::active()
            .filter(users::Column::Username.eq(username))
            .one(db)
            .await?
            .ok_or_else(rejected)?;

        let is_valid = password::verify_password(password_attempt, &user.password_hash)
            .map_err(ApiError::Internal)?;
        if !is_valid {
            return Err(rejected());
        }

        Ok(user)
    }

    /// POST /profiles : crée ou met à jour le profil de l'utilisateur connecté
    pub async fn save_own_profile(
        db: &DatabaseConnection,
        user_id: i32,
        request: OwnProfileRequest,
    ) -> Result<(users::Model, profile::Model), ApiError> {
        let mut errors = field_errors(&request);

        // Le username reste unique, hors compte courant
        if let Some(username) = &request.username {
            let taken = users::Entity::find()
                .filter(users::Column::Username.eq(username))
                .filter(users::Column::Id.ne(user_id))
                .count(db)
                .await?
                > 0;
            if taken {
                errors.add("username", USERNAME_TAKEN);
            }
        }
        errors.into_result()?;

        let txn = db.begin().await?;

        // 1. Noms et username du compte
        let user = LifecycleService::find_or_404::<users::Entity, _>(&txn, user_id).await?;
        let mut account: users::ActiveModel = user.into();
        if let Some(username) = request.username {
            account.username = Set(username);
        }
        if let Some(first_name) = request.first_name {
            account.first_name = Set(first_name);
        }
        if let Some(last_name) = request.last_name {
            account.last_name = Set(last_name);
        }
        let user = account.update(&txn).await?;

        // 2. Profil : un seul par utilisateur
        let existing = profile::Entity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(&txn)
            .await?;

        let mut active = match existing {
            Some(profile) => profile.into(),
            None => profile::ActiveModel {
                user_id: Set(user_id),
                lifecycle: Set(Lifecycle::Active),
                about: Set(None),
                profile_image: Set(None),
                banner_image: Set(None),
                vine_link: Set(None),
                facebook_link: Set(None),
                twitter_link: Set(None),
                google_plus_link: Set(None),
                ..Default::default()
            },
        };
        request.profile.apply(&mut active);
        let profile = active.save(&txn).await?.try_into_model()?;

        txn.commit().await?;
        Ok((user, profile))
    }

    /// PUT /profiles/{id} (admin)
    pub async fn update_profile(
        db: &DatabaseConnection,
        id: i32,
        update: ProfileUpdate,
    ) -> Result<profile::Model, ApiError> {
        let profile = LifecycleService::find_or_404::<profile::Entity, _>(db, id).await?;
        field_errors(&update).into_result()?;

        let mut active: profile::ActiveModel = profile.into();
        update.apply(&mut active);
        Ok(active.update(db).await?)
    }

    /// Profils actifs : nom de l'utilisateur + image
    pub async fn public_profiles(db: &DatabaseConnection) -> Result<Vec<PublicProfile>, DbErr> {
        let rows = profile::Entity::active()
            .find_also_related(users::Entity)
            .order_by_asc(profile::Column::Id)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(profile, user)| PublicProfile {
                user_name: user.map(|u| u.full_name()).unwrap_or_default(),
                profile_image: profile.profile_image,
            })
            .collect())
    }

    /// Propriétaires des NFTs actifs, du prix le plus élevé au plus bas
    pub async fn top_sellers(db: &DatabaseConnection) -> Result<Vec<PublicProfile>, DbErr> {
        // 1. NFTs actifs triés par prix décroissant
        let nfts = nft::Entity::active()
            .order_by_desc(nft::Column::Price)
            .order_by_asc(nft::Column::Id)
            .all(db)
            .await?;

        if nfts.is_empty() {
            return Ok(Vec::new());
        }

        let owner_ids: Vec<i32> = nfts.iter().map(|n| n.owner_id).collect();

        // 2. Noms et images des propriétaires en deux requêtes
        let names = crate::serializers::user_names(db, owner_ids.iter().copied()).await?;
        let images: HashMap<i32, Option<String>> = profile::Entity::find()
            .filter(profile::Column::UserId.is_in(owner_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.user_id, p.profile_image))
            .collect();

        // 3. Une ligne par NFT, dans l'ordre des prix
        Ok(nfts
            .into_iter()
            .map(|n| PublicProfile {
                user_name: crate::serializers::label(&names, n.owner_id),
                profile_image: images.get(&n.owner_id).cloned().flatten(),
            })
            .collect())
    }

    /// Profil actif d'un utilisateur avec ses NFTs actifs
    pub async fn user_nfts(db: &DatabaseConnection, user_id: i32) -> Result<UserNftData, ApiError> {
        let profile = profile::Entity::active()
            .filter(profile::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or(ApiError::NotFound("Profile"))?;

        let user = LifecycleService::find_or_404::<users::Entity, _>(db, user_id).await?;

        let nfts = nft::Entity::active()
            .filter(nft::Column::OwnerId.eq(user_id))
            .order_by_asc(nft::Column::Id)
            .all(db)
            .await?;

        Ok(UserNftData {
            user_name: user.full_name(),
            user_email: user.email,
            profile_image: profile.profile_image,
            banner_image: profile.banner_image,
            nfts: nfts
                .into_iter()
                .map(|n| OwnedNft {
                    name: n.name,
                    description: n.description,
                    image: n.image,
                })
                .collect(),
        })
    }
}
