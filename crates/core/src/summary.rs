//! Per-user balance overview.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::{TransactionSummary, TransactionType};

/// Totals shown on the balance summary endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Number of accounts.
    pub account_count: u64,
    /// Sum of account balances.
    pub total_balance: Decimal,
    /// Sum of all deposits.
    pub total_deposits: Decimal,
    /// Sum of all withdrawals.
    pub total_withdrawals: Decimal,
    /// `total_deposits - total_withdrawals`.
    pub net: Decimal,
}

impl BalanceSummary {
    /// Combines account balances with the user's transaction history.
    pub fn new<B, T>(balances: B, transactions: T) -> Self
    where
        B: IntoIterator<Item = Decimal>,
        T: IntoIterator<Item = (TransactionType, Decimal)>,
    {
        let (account_count, total_balance) = balances
            .into_iter()
            .fold((0u64, Decimal::ZERO), |(n, sum), b| (n + 1, sum + b));
        let flows = TransactionSummary::from_entries(transactions);

        Self {
            account_count,
            total_balance,
            total_deposits: flows.total_deposits,
            total_withdrawals: flows.total_withdrawals,
            net: flows.net,
        }
    }
}
