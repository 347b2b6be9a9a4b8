use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::error::ApiError;
use crate::models::{Lifecycle, category, contact, faq};
use crate::serializers::site::{ContactCreate, ContactUpdate, FaqCreate, FaqUpdate};
use crate::serializers::{check_optional_reference, check_reference, field_errors};
use crate::services::lifecycle::LifecycleService;

pub struct SiteService;

impl SiteService {
    /// `updated_by` vient du token
    pub async fn create_faq(
        db: &DatabaseConnection,
        payload: FaqCreate,
        updated_by: i32,
    ) -> Result<faq::Model, ApiError> {
        let mut errors = field_errors(&payload);
        check_reference::<category::Entity, _>(db, "category", payload.category, &mut errors)
            .await?;
        errors.into_result()?;

        let now = Utc::now();
        let faq = faq::ActiveModel {
            title: Set(payload.title),
            description: Set(payload.description),
            category_id: Set(payload.category),
            updated_by: Set(updated_by),
            lifecycle: Set(Lifecycle::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(faq)
    }

    /// Le dernier admin ayant modifié la FAQ devient `updated_by`
    pub async fn update_faq(
        db: &DatabaseConnection,
        id: i32,
        update: FaqUpdate,
        updated_by: i32,
    ) -> Result<faq::Model, ApiError> {
        let faq = LifecycleService::find_or_404::<faq::Entity, _>(db, id).await?;

        let mut errors = field_errors(&update);
        check_optional_reference::<category::Entity, _>(db, "category", update.category, &mut errors)
            .await?;
        errors.into_result()?;

        let mut active: faq::ActiveModel = faq.into();
        update.apply(&mut active);
        active.updated_by = Set(updated_by);
        active.updated_at = Set(Utc::now());
        Ok(active.update(db).await?)
    }

    /// Formulaire de contact public
    pub async fn submit_contact(
        db: &DatabaseConnection,
        payload: ContactCreate,
    ) -> Result<contact::Model, ApiError> {
        field_errors(&payload).into_result()?;

        let contact = contact::ActiveModel {
            name: Set(payload.name),
            email: Set(payload.email),
            subject: Set(payload.subject),
            message: Set(payload.message),
            is_resolved: Set(false),
            resolved_by: Set(None),
            lifecycle: Set(Lifecycle::Active),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(contact)
    }

    pub async fn update_contact(
        db: &DatabaseConnection,
        id: i32,
        update: ContactUpdate,
    ) -> Result<contact::Model, ApiError> {
        let contact = LifecycleService::find_or_404::<contact::Entity, _>(db, id).await?;
        field_errors(&update).into_result()?;

        let mut active: contact::ActiveModel = contact.into();
        update.apply(&mut active);
        Ok(active.update(db).await?)
    }

    /// is_resolved + resolved_by en un seul UPDATE
    pub async fn resolve_contact(
        db: &DatabaseConnection,
        id: i32,
        resolver_id: i32,
    ) -> Result<(), ApiError> {
        LifecycleService::update_columns::<contact::Entity, _>(
            db,
            id,
            vec![
                (contact::Column::IsResolved, Expr::value(true)),
                (contact::Column::ResolvedBy, Expr::value(resolver_id)),
            ],
        )
        .await?;

        log::info!("Contact {} resolved by user {}", id, resolver_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{count_row, exec, faq as faq_row};

    #[tokio::test]
    async fn test_faq_editor_from_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_row(1)])
            .append_query_results([vec![faq_row(1, 3)]])
            .into_connection();

        let payload: FaqCreate = serde_json::from_str(
            r#"{"title": "How?", "description": "Like this", "category": 1, "updated_by": 77}"#,
        )
        .unwrap();
        SiteService::create_faq(&db, payload, 3).await.unwrap();

        let insert = format!("{:?}", db.into_transaction_log()[1]);
        assert!(insert.contains("Int(Some(3))"));
        assert!(!insert.contains("Int(Some(77))"));
    }

    #[tokio::test]
    async fn test_resolve_contact_records_resolver() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .into_connection();

        SiteService::resolve_contact(&db, 4, 2).await.unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statement = format!("{:?}", log[0]);
        assert!(statement.contains("resolved_by"));
        assert!(statement.contains("is_resolved"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_contact() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();

        let err = SiteService::resolve_contact(&db, 99, 2).await.unwrap_err();
        assert_eq!(err.to_string(), "Contact does not exist");
    }
}
