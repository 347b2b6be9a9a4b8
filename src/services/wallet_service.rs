use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::*;

use crate::error::{ApiError, FieldErrors, REQUIRED_MESSAGE};
use crate::models::wallet_transaction::TransactionType;
use crate::models::{Lifecycle, wallet, wallet_transaction};
use crate::serializers::field_errors;
use crate::serializers::wallet::{WalletCreate, WalletTransactionCreate, WalletUpdate};
use crate::services::lifecycle::LifecycleService;

pub struct WalletService;

impl WalletService {
    /// Un seul wallet par utilisateur ; le solde démarre à 0
    pub async fn create_wallet(
        db: &DatabaseConnection,
        payload: WalletCreate,
        user_id: i32,
    ) -> Result<wallet::Model, ApiError> {
        let mut errors = field_errors(&payload);

        let existing = wallet::Entity::find()
            .filter(wallet::Column::UserId.eq(user_id))
            .count(db)
            .await?;
        if existing > 0 {
            errors.add("user", "Wallet with this user already exists.");
        }
        errors.into_result()?;

        let wallet = wallet::ActiveModel {
            user_id: Set(user_id),
            current_balance: Set(Decimal::ZERO),
            wallet_address: Set(payload.wallet_address),
            is_verified: Set(false),
            is_active: Set(true),
            lifecycle: Set(Lifecycle::Active),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(wallet)
    }

    pub async fn update_wallet(
        db: &DatabaseConnection,
        id: i32,
        update: WalletUpdate,
    ) -> Result<wallet::Model, ApiError> {
        let wallet = LifecycleService::find_or_404::<wallet::Entity, _>(db, id).await?;
        field_errors(&update).into_result()?;

        let mut active: wallet::ActiveModel = wallet.into();
        update.apply(&mut active);
        Ok(active.update(db).await?)
    }

    /// Nouveau solde après un mouvement ; un paiement ne peut pas rendre le solde négatif
    pub fn apply_movement(
        balance: Decimal,
        kind: TransactionType,
        amount: Decimal,
    ) -> Result<Decimal, FieldErrors> {
        if !kind.is_debit() {
            return balance.checked_add(amount).ok_or_else(Self::balance_overflow);
        }

        if balance < amount {
            return Err(FieldErrors::single(
                "amount",
                Self::insufficient_funds_message(balance, amount),
            ));
        }
        balance.checked_sub(amount).ok_or_else(Self::balance_overflow)
    }

    /// Le solde doit rester représentable
    fn balance_overflow() -> FieldErrors {
        FieldErrors::single("amount", "This amount would overflow the wallet balance.")
    }

    /// Message d'erreur détaillé en cas de fonds insuffisants
    pub fn insufficient_funds_message(balance: Decimal, required_amount: Decimal) -> String {
        format!(
            "Insufficient funds: {} available, {} required (shortage: {})",
            balance,
            required_amount,
            required_amount - balance
        )
    }

    /// Mouvement atomique : mise à jour du solde + ligne de journal, ou rien
    pub async fn record_movement(
        db: &DatabaseConnection,
        wallet_id: i32,
        payload: WalletTransactionCreate,
    ) -> Result<(wallet::Model, wallet_transaction::Model), ApiError> {
        field_errors(&payload).into_result()?;
        let Some(kind) = payload.transaction_type else {
            return Err(FieldErrors::single("transaction_type", REQUIRED_MESSAGE).into());
        };

        let txn = db.begin().await?;

        // 1. Verrouiller le wallet (SELECT ... FOR UPDATE)
        let wallet = wallet::Entity::find_by_id(wallet_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ApiError::NotFound("Wallet"))?;

        if wallet.lifecycle.is_removed() || !wallet.is_active {
            return Err(FieldErrors::single("wallet", "This wallet is not active.").into());
        }

        // 2. Calculer le nouveau solde
        let balance = Self::apply_movement(wallet.current_balance, kind, payload.amount)?;

        // 3. Mettre à jour le solde
        let mut active: wallet::ActiveModel = wallet.into();
        active.current_balance = Set(balance);
        let wallet = active.update(&txn).await?;

        // 4. Journaliser le mouvement
        let entry = wallet_transaction::ActiveModel {
            wallet_id: Set(wallet_id),
            amount: Set(payload.amount),
            transaction_type: Set(kind),
            transaction_date: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Wallet {}: {:?} of {}, balance now {}",
            wallet_id,
            kind,
            payload.amount,
            wallet.current_balance
        );
        Ok((wallet, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{count_row, wallet as wallet_row};

    #[test]
    fn test_apply_movement() {
        let balance = Decimal::new(100, 0);
        assert_eq!(
            WalletService::apply_movement(balance, TransactionType::Deposit, Decimal::new(50, 0)),
            Ok(Decimal::new(150, 0))
        );
        assert_eq!(
            WalletService::apply_movement(balance, TransactionType::Received, Decimal::new(1, 0)),
            Ok(Decimal::new(101, 0))
        );
        assert_eq!(
            WalletService::apply_movement(balance, TransactionType::Pay, Decimal::new(100, 0)),
            Ok(Decimal::ZERO)
        );
    }

    #[test]
    fn test_deposit_overflowing_balance_is_rejected() {
        let errors =
            WalletService::apply_movement(Decimal::MAX, TransactionType::Deposit, Decimal::ONE)
                .unwrap_err();
        assert_eq!(
            errors.get("amount").unwrap()[0],
            "This amount would overflow the wallet balance."
        );

        // Un débit négatif crédite en pratique
        assert!(
            WalletService::apply_movement(Decimal::MAX, TransactionType::Pay, Decimal::NEGATIVE_ONE)
                .is_err()
        );
    }

    #[test]
    fn test_overdraft_is_rejected() {
        let errors = WalletService::apply_movement(
            Decimal::new(20, 0),
            TransactionType::Pay,
            Decimal::new(50, 0),
        )
        .unwrap_err();

        assert_eq!(
            errors.get("amount").unwrap()[0],
            "Insufficient funds: 20 available, 50 required (shortage: 30)"
        );
    }

    #[tokio::test]
    async fn test_pay_beyond_balance_writes_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![wallet_row(1, 2, 20)]])
            .into_connection();

        let payload: WalletTransactionCreate =
            serde_json::from_str(r#"{"amount": 50, "transaction_type": "pay"}"#).unwrap();
        let err = WalletService::record_movement(&db, 1, payload)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        // ni UPDATE du solde ni ligne de journal
        let statements = format!("{:?}", db.into_transaction_log());
        assert!(!statements.contains(" SET "));
        assert!(!statements.contains("INSERT"));
    }

    #[tokio::test]
    async fn test_deposit_updates_balance_and_ledger_together() {
        let entry = wallet_transaction::Model {
            id: 1,
            wallet_id: 1,
            amount: Decimal::new(30, 0),
            transaction_type: TransactionType::Deposit,
            transaction_date: Utc::now(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![wallet_row(1, 2, 20)]])
            .append_query_results([vec![wallet_row(1, 2, 50)]])
            .append_query_results([vec![entry]])
            .into_connection();

        let payload: WalletTransactionCreate =
            serde_json::from_str(r#"{"amount": 30, "transaction_type": "deposit"}"#).unwrap();
        let (wallet, entry) = WalletService::record_movement(&db, 1, payload).await.unwrap();

        assert_eq!(wallet.current_balance, Decimal::new(50, 0));
        assert_eq!(entry.transaction_type, TransactionType::Deposit);

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statements = format!("{:?}", log[0]);
        assert!(statements.contains("wallet_transactions"));
    }

    #[tokio::test]
    async fn test_second_wallet_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_row(1)])
            .into_connection();

        let payload: WalletCreate = serde_json::from_str(r#"{"wallet_address": "0xabc"}"#).unwrap();
        let err = WalletService::create_wallet(&db, payload, 2).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
