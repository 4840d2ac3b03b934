//! Aggregates over transaction sets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::TransactionType;

/// Deposit/withdrawal totals for a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// Number of transactions.
    pub count: u64,
    /// Number of deposits.
    pub deposit_count: u64,
    /// Number of withdrawals.
    pub withdrawal_count: u64,
    /// Sum of deposit amounts.
    pub total_deposits: Decimal,
    /// Sum of withdrawal amounts.
    pub total_withdrawals: Decimal,
    /// `total_deposits - total_withdrawals`.
    pub net: Decimal,
}

impl TransactionSummary {
    /// Builds a summary from `(type, amount)` pairs.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (TransactionType, Decimal)>,
    {
        let mut summary = Self::default();
        for (kind, amount) in entries {
            summary.count += 1;
            match kind {
                TransactionType::Deposit => {
                    summary.deposit_count += 1;
                    summary.total_deposits += amount;
                }
                TransactionType::Withdrawal => {
                    summary.withdrawal_count += 1;
                    summary.total_withdrawals += amount;
                }
            }
        }
        summary.net = summary.total_deposits - summary.total_withdrawals;
        summary
    }
}

/// Withdrawal totals for a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpending {
    /// Number of withdrawals.
    pub count: u64,
    /// Sum of withdrawal amounts.
    pub total_spent: Decimal,
    /// Mean withdrawal, rounded to cents; `None` without withdrawals.
    pub average: Option<Decimal>,
}

impl CategorySpending {
    /// Builds spending figures from withdrawal amounts.
    pub fn from_withdrawals<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let (count, total_spent) = amounts
            .into_iter()
            .fold((0u64, Decimal::ZERO), |(n, sum), amount| (n + 1, sum + amount));

        let average = (count > 0).then(|| (total_spent / Decimal::from(count)).round_dp(2));

        Self {
            count,
            total_spent,
            average,
        }
    }
}
