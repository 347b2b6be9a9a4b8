// ============================================================================
// SÉRIALISATION
// ============================================================================
//
// Description:
//   Passage entité -> JSON (les clés étrangères deviennent des libellés
//   lisibles) et payloads d'entrée validés (validator).
//
// Libellés:
//   - user -> "Prénom Nom"
//   - nft / collection / category -> name
//   - wallet -> wallet_address
//   Chargés par lot : une requête IN par table référencée, jamais une par ligne.
//
// Points d'attention:
//   - Les payloads de création ne contiennent que les champs écrits par le
//     client ; la doc de chaque payload nomme ceux assignés depuis le token
//   - Les payloads de mise à jour sont tout-Option (PUT et PATCH identiques)
//
// ============================================================================

pub mod accounts;
pub mod catalog;
pub mod site;
pub mod trading;
pub mod wallet;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter,
};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use validator::{Validate, ValidationError};

use crate::error::{FieldErrors, REQUIRED_MESSAGE};
use crate::models::{Listable, category, collection, nft, users, wallet as wallet_model};
use crate::pagination::Page;

/// Représentation JSON d'une entité, libellés résolus par lot
#[async_trait(?Send)]
pub trait Represent: Sized {
    type Output: Serialize;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<Self::Output>, DbErr>;

    async fn represent(db: &DatabaseConnection, row: Self) -> Result<Self::Output, DbErr> {
        Self::represent_all(db, vec![row])
            .await?
            .pop()
            .ok_or_else(|| DbErr::Custom("empty representation".to_string()))
    }
}

/// Représente les éléments d'une page en gardant ses métadonnées
pub async fn represent_page<M: Represent>(
    db: &DatabaseConnection,
    mut page: Page<M>,
) -> Result<Page<M::Output>, DbErr> {
    let rows = std::mem::take(&mut page.items);
    let items = M::represent_all(db, rows).await?;
    Ok(page.with_items(items))
}

// Fonction helper pour convertir Decimal en f64 (rendu JSON des montants)
pub fn decimal_to_f64(decimal: Decimal) -> f64 {
    decimal.to_f64().unwrap_or(0.0)
}

/// Libellé d'une clé étrangère, chaîne vide si la ligne a disparu
pub fn label(labels: &HashMap<i32, String>, id: i32) -> String {
    labels.get(&id).cloned().unwrap_or_default()
}

async fn load_labels<E, F>(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = i32>,
    to_label: F,
) -> Result<HashMap<i32, String>, DbErr>
where
    E: Listable,
    F: Fn(E::Model) -> (i32, String),
{
    let ids: BTreeSet<i32> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = E::find().filter(E::id_column().is_in(ids)).all(db).await?;
    Ok(rows.into_iter().map(to_label).collect())
}

pub async fn user_names(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, String>, DbErr> {
    load_labels::<users::Entity, _>(db, ids, |u| (u.id, u.full_name())).await
}

pub async fn nft_names(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, String>, DbErr> {
    load_labels::<nft::Entity, _>(db, ids, |n| (n.id, n.name)).await
}

pub async fn collection_names(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, String>, DbErr> {
    load_labels::<collection::Entity, _>(db, ids, |c| (c.id, c.name)).await
}

pub async fn category_names(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, String>, DbErr> {
    load_labels::<category::Entity, _>(db, ids, |c| (c.id, c.name)).await
}

pub async fn wallet_addresses(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, String>, DbErr> {
    load_labels::<wallet_model::Entity, _>(db, ids, |w| (w.id, w.wallet_address)).await
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Résultat de validator::Validate converti en erreurs par champ
pub fn field_errors<T: Validate>(payload: &T) -> FieldErrors {
    match payload.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.into(),
    }
}

/// Ajoute une erreur si la clé étrangère ne pointe vers aucune ligne
pub async fn check_reference<E, C>(
    db: &C,
    field: &str,
    id: i32,
    errors: &mut FieldErrors,
) -> Result<(), DbErr>
where
    E: Listable,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let found = E::find().filter(E::id_column().eq(id)).count(db).await?;
    if found == 0 {
        errors.missing_reference(field, id);
    }
    Ok(())
}

/// Variante pour les champs optionnels des payloads de mise à jour
pub async fn check_optional_reference<E, C>(
    db: &C,
    field: &str,
    id: Option<i32>,
    errors: &mut FieldErrors,
) -> Result<(), DbErr>
where
    E: Listable,
    E::Model: Sync,
    C: ConnectionTrait,
{
    match id {
        Some(id) => check_reference::<E, C>(db, field, id, errors).await,
        None => Ok(()),
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Champ texte obligatoire (un champ absent arrive vide)
pub fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", REQUIRED_MESSAGE));
    }
    Ok(())
}

/// Champ texte présent dans une mise à jour : ne peut pas être vidé
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "This field may not be blank."));
    }
    Ok(())
}

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid(
            "min_value",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    Ok(())
}

pub fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(invalid("min_value", "Ensure this value is greater than 0."));
    }
    Ok(())
}
