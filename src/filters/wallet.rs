use sea_orm::{ColumnTrait, QueryFilter, QueryTrait, Select};
use serde::Deserialize;

use super::{ResourceFilter, empty_as_none};
use crate::models::wallet_transaction::TransactionType;
use crate::models::{wallet, wallet_transaction};

#[derive(Debug, Default, Deserialize)]
pub struct WalletFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user: Option<i32>,
}

impl ResourceFilter<wallet::Entity> for WalletFilter {
    fn apply(&self, select: Select<wallet::Entity>) -> Select<wallet::Entity> {
        select.apply_if(self.user, |q, v| q.filter(wallet::Column::UserId.eq(v)))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WalletTransactionFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub transaction_type: Option<TransactionType>,
}

impl ResourceFilter<wallet_transaction::Entity> for WalletTransactionFilter {
    fn apply(
        &self,
        select: Select<wallet_transaction::Entity>,
    ) -> Select<wallet_transaction::Entity> {
        select.apply_if(self.transaction_type, |q, v| {
            q.filter(wallet_transaction::Column::TransactionType.eq(v))
        })
    }
}
