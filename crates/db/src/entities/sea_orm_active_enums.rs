//! Postgres enum types.

use fintrack_core::transaction::TransactionType as CoreTransactionType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `transaction_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money in.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Money out.
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
}

impl From<CoreTransactionType> for TransactionType {
    fn from(value: CoreTransactionType) -> Self {
        match value {
            CoreTransactionType::Deposit => Self::Deposit,
            CoreTransactionType::Withdrawal => Self::Withdrawal,
        }
    }
}

impl From<TransactionType> for CoreTransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Deposit => Self::Deposit,
            TransactionType::Withdrawal => Self::Withdrawal,
        }
    }
}
