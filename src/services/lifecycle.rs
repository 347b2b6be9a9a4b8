// ============================================================================
// LIFECYCLE SERVICE - OPÉRATIONS COMMUNES À TOUTES LES RESSOURCES
// ============================================================================
//
// Description:
//   Détail (404 si absent), suppression logique et bascule de drapeaux,
//   partagés par l'API et le panel admin.
//
// Points d'attention:
//   - Le détail ne filtre PAS sur lifecycle : un élément supprimé reste lisible
//   - Une seule requête UPDATE ... WHERE id = ? ; 0 ligne touchée = 404
//   - Aucune cascade vers les entités liées
//
// ============================================================================

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::*;

use crate::error::ApiError;
use crate::models::{Lifecycle, Listable, SoftDeletable};

pub struct LifecycleService;

impl LifecycleService {
    /// Charge une ligne par id, quel que soit son lifecycle
    pub async fn find_or_404<E, C>(db: &C, id: i32) -> Result<E::Model, ApiError>
    where
        E: Listable,
        C: ConnectionTrait,
    {
        E::find()
            .filter(E::id_column().eq(id))
            .one(db)
            .await?
            .ok_or(ApiError::NotFound(E::LABEL))
    }

    /// UPDATE ciblé sur une ligne ; NotFound si l'id n'existe pas
    pub async fn update_columns<E, C>(
        db: &C,
        id: i32,
        changes: Vec<(E::Column, SimpleExpr)>,
    ) -> Result<(), ApiError>
    where
        E: Listable,
        C: ConnectionTrait,
    {
        let update = changes
            .into_iter()
            .fold(E::update_many(), |update, (column, value)| {
                update.col_expr(column, value)
            });

        let result = update.filter(E::id_column().eq(id)).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(ApiError::NotFound(E::LABEL));
        }
        Ok(())
    }

    /// Active -> Removed (transition définitive)
    pub async fn soft_delete<E, C>(db: &C, id: i32) -> Result<(), ApiError>
    where
        E: SoftDeletable,
        C: ConnectionTrait,
    {
        Self::update_columns::<E, C>(
            db,
            id,
            vec![(E::lifecycle_column(), Expr::value(Lifecycle::Removed))],
        )
        .await?;

        log::info!("{} {} removed", E::LABEL, id);
        Ok(())
    }

    /// Passe un drapeau booléen secondaire (is_resolved, is_hidden...) à `value`
    pub async fn set_flag<E, C>(db: &C, id: i32, column: E::Column, value: bool) -> Result<(), ApiError>
    where
        E: Listable,
        C: ConnectionTrait,
    {
        Self::update_columns::<E, C>(db, id, vec![(column, Expr::value(value))]).await?;

        log::info!("{} {}: {} = {}", E::LABEL, id, column.as_str(), value);
        Ok(())
    }
}
