//! Transaction types and validation.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::TransactionError;
use crate::budget::service::{BUDGET_AMOUNT_LIMIT, fits_money_scale};

/// Maximum length of a transaction description.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Direction of money movement on an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money in.
    Deposit,
    /// Money out.
    Withdrawal,
}

impl TransactionType {
    /// Effect of `amount` on the account balance.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Deposit => amount,
            Self::Withdrawal => -amount,
        }
    }

    /// Amount this transaction adds to a linked budget's spend.
    #[must_use]
    pub fn spend(self, amount: Decimal) -> Decimal {
        match self {
            Self::Deposit => Decimal::ZERO,
            Self::Withdrawal => amount,
        }
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            _ => Err(TransactionError::UnknownType(s.to_string())),
        }
    }
}

/// Validates the amount and description of a transaction.
///
/// Empty descriptions are accepted.
///
/// # Errors
///
/// Returns `NonPositiveAmount`, `AmountOutOfRange`, `TooManyDecimalPlaces`
/// or `DescriptionTooLong`.
pub fn validate_transaction(amount: Decimal, description: &str) -> Result<(), TransactionError> {
    if amount <= Decimal::ZERO {
        return Err(TransactionError::NonPositiveAmount);
    }
    if amount >= BUDGET_AMOUNT_LIMIT {
        return Err(TransactionError::AmountOutOfRange);
    }
    if !fits_money_scale(amount) {
        return Err(TransactionError::TooManyDecimalPlaces);
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(TransactionError::DescriptionTooLong {
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(())
}
