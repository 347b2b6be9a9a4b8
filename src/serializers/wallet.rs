use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{
    Represent, decimal_to_f64, label, not_blank, positive, required_text, user_names,
    wallet_addresses,
};
use crate::models::wallet_transaction::TransactionType;
use crate::models::{wallet, wallet_transaction};

#[derive(Debug, Serialize)]
pub struct WalletOut {
    pub id: i32,
    pub user: String,
    pub current_balance: f64,
    pub wallet_address: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_removed: bool,
}

#[async_trait(?Send)]
impl Represent for wallet::Model {
    type Output = WalletOut;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<WalletOut>, DbErr> {
        let users = user_names(db, rows.iter().map(|w| w.user_id)).await?;

        Ok(rows
            .into_iter()
            .map(|w| WalletOut {
                id: w.id,
                user: label(&users, w.user_id),
                current_balance: decimal_to_f64(w.current_balance),
                is_removed: w.lifecycle.is_removed(),
                wallet_address: w.wallet_address,
                is_verified: w.is_verified,
                is_active: w.is_active,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
pub struct WalletTransactionOut {
    pub id: i32,
    pub wallet: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub transaction_date: DateTime<Utc>,
}

#[async_trait(?Send)]
impl Represent for wallet_transaction::Model {
    type Output = WalletTransactionOut;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<WalletTransactionOut>, DbErr> {
        let wallets = wallet_addresses(db, rows.iter().map(|t| t.wallet_id)).await?;

        Ok(rows
            .into_iter()
            .map(|t| WalletTransactionOut {
                id: t.id,
                wallet: label(&wallets, t.wallet_id),
                amount: decimal_to_f64(t.amount),
                transaction_type: t.transaction_type,
                transaction_date: t.transaction_date,
            })
            .collect())
    }
}

/// `user` vient du token : une valeur envoyée par le client est ignorée
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct WalletCreate {
    #[validate(
        custom(function = "required_text"),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub wallet_address: String,
}

/// Le solde n'est jamais modifiable ici : uniquement via une transaction wallet
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct WalletUpdate {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub wallet_address: Option<String>,
    pub is_verified: Option<bool>,
    pub is_active: Option<bool>,
}

impl WalletUpdate {
    pub fn apply(self, wallet: &mut wallet::ActiveModel) {
        if let Some(address) = self.wallet_address {
            wallet.wallet_address = Set(address);
        }
        if let Some(verified) = self.is_verified {
            wallet.is_verified = Set(verified);
        }
        if let Some(active) = self.is_active {
            wallet.is_active = Set(active);
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct WalletTransactionCreate {
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    #[validate(required(message = "This field is required."))]
    pub transaction_type: Option<TransactionType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializers::field_errors;

    #[test]
    fn test_movement_requires_type_and_amount() {
        let payload: WalletTransactionCreate = serde_json::from_str("{}").unwrap();
        let errors = field_errors(&payload);

        assert_eq!(
            errors.get("transaction_type").unwrap()[0],
            "This field is required."
        );
        assert!(errors.get("amount").is_some());
    }

    #[test]
    fn test_balance_is_not_writable() {
        let update: WalletUpdate =
            serde_json::from_str(r#"{"current_balance": 1000000, "is_verified": true}"#).unwrap();
        let mut active = wallet::ActiveModel::default();
        update.apply(&mut active);

        assert!(active.current_balance.is_not_set());
        assert_eq!(active.is_verified, Set(true));
    }
}
