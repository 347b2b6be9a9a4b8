// ============================================================================
// FILTRES DE LISTE
// ============================================================================
//
// Description:
//   Traduisent les paramètres de la query string en prédicats SeaORM.
//   Une structure par ressource, champs Option : absent = aucune contrainte.
//
// Points d'attention:
//   - Clés inconnues (dont `page`) ignorées par serde
//   - Valeur vide (`?name=`) = clé absente, comme un formulaire non rempli
//   - Valeur non convertible (`?price=abc`) = 400
//   - L'ordre (id croissant) est appliqué par pagination::paginate
//
// ============================================================================

pub mod accounts;
pub mod catalog;
pub mod site;
pub mod trading;
pub mod wallet;

use sea_orm::{EntityTrait, Select};
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

pub use accounts::{ProfileFilter, UserFilter};
pub use catalog::{
    CategoryFilter, CollectionFilter, FavouriteNftFilter, NftFilter, PriceHistoryFilter,
    ReportedNftFilter,
};
pub use site::{ContactFilter, FaqFilter};
pub use trading::{BiddingFilter, NftTransactionFilter};
pub use wallet::{WalletFilter, WalletTransactionFilter};

/// Restreint une requête selon les paramètres fournis
pub trait ResourceFilter<E: EntityTrait> {
    fn apply(&self, select: Select<E>) -> Select<E>;
}

/// Option<T> depuis la query string : "" -> None
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Booléen tolérant : true/false, 1/0, True/False
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(value) => match value.as_str() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "'{}' is not a valid boolean",
                other
            ))),
        },
    }
}

#[cfg(test)]
pub(crate) fn sql<E: EntityTrait>(select: Select<E>) -> String {
    use sea_orm::{DbBackend, QueryTrait};
    select.build(DbBackend::Postgres).to_string()
}
