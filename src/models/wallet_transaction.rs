// Journal des mouvements du wallet : ajout seulement, pas de lifecycle.
use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::lifecycle::Listable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(40))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "pay")]
    Pay,
    #[sea_orm(string_value = "deposit")]
    Deposit,
    #[sea_orm(string_value = "received")]
    Received,
}

impl TransactionType {
    /// Signe appliqué au solde : pay débite, deposit / received créditent
    pub fn is_debit(self) -> bool {
        matches!(self, TransactionType::Pay)
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pay" => Ok(TransactionType::Pay),
            "deposit" => Ok(TransactionType::Deposit),
            "received" => Ok(TransactionType::Received),
            other => Err(format!(
                "'{}' is not a valid transaction type (pay, deposit, received)",
                other
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub wallet_id: i32,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub transaction_date: DateTimeUtc, // assigné par le serveur
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallet::Entity",
        from = "Column::WalletId",
        to = "super::wallet::Column::Id"
    )]
    Wallet,
}

impl Related<super::wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Listable for Entity {
    const LABEL: &'static str = "Wallet transaction";

    fn id_column() -> Column {
        Column::Id
    }
}
