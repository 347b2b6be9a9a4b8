// ============================================================================
// LIFECYCLE - SUPPRESSION LOGIQUE COMMUNE
// ============================================================================
//
// Description:
//   Une seule colonne `lifecycle` remplace les drapeaux is_removed / is_active
//   / status dispersés entre les tables. Transition unique et définitive :
//   Active -> Removed (aucune résurrection exposée).
//
// Helpers:
//   - Listable::id_column() : ordre par défaut des listes (id croissant)
//   - SoftDeletable::active() : requête "éléments visibles" partagée
//
// ============================================================================

use sea_orm::entity::prelude::*;
use sea_orm::Select;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "removed")]
    Removed,
}

impl Lifecycle {
    pub fn is_active(self) -> bool {
        self == Lifecycle::Active
    }

    pub fn is_removed(self) -> bool {
        self == Lifecycle::Removed
    }

    /// Projection du filtre `is_removed=true|false` des listes admin
    pub fn from_removed_flag(is_removed: bool) -> Self {
        if is_removed {
            Lifecycle::Removed
        } else {
            Lifecycle::Active
        }
    }
}

/// Entité listable : l'ordre par défaut est l'id croissant
pub trait Listable: EntityTrait {
    fn id_column() -> Self::Column;

    /// Nom lisible utilisé dans les messages 404 ("NFT does not exist")
    const LABEL: &'static str;
}

/// Entité supprimable logiquement (colonne lifecycle)
pub trait SoftDeletable: Listable {
    fn lifecycle_column() -> Self::Column;

    /// Requête de base des listes publiques : exclut les éléments supprimés
    fn active() -> Select<Self> {
        Self::find().filter(Self::lifecycle_column().eq(Lifecycle::Active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_active() {
        assert_eq!(Lifecycle::default(), Lifecycle::Active);
        assert!(Lifecycle::default().is_active());
    }

    #[test]
    fn test_removed_flag_projection() {
        assert_eq!(Lifecycle::from_removed_flag(true), Lifecycle::Removed);
        assert_eq!(Lifecycle::from_removed_flag(false), Lifecycle::Active);
        assert!(Lifecycle::Removed.is_removed());
    }
}
