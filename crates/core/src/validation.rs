//! Field rules for accounts and categories.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::budget::service::fits_money_scale;

/// Maximum length of account and category names.
pub const MAX_NAME_LEN: usize = 100;

/// Exclusive bound of a `NUMERIC(15,2)` balance.
pub const BALANCE_LIMIT: Decimal = Decimal::from_parts(1_316_134_912, 2_328, 0, false, 0);

/// Account/category validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is blank.
    #[error("Name cannot be empty")]
    EmptyName,

    /// Name exceeds the column width.
    #[error("Name cannot exceed {max} characters")]
    NameTooLong {
        /// Maximum allowed length.
        max: usize,
    },

    /// Balance does not fit the column.
    #[error("Balance is out of range")]
    BalanceOutOfRange,

    /// Balance has more than two decimal places.
    #[error("Ensure that there are no more than 2 decimal places")]
    TooManyDecimalPlaces,
}

/// Checks a display name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(())
}

/// Checks an account's name and balance. Negative balances are allowed.
pub fn validate_account(name: &str, balance: Decimal) -> Result<(), ValidationError> {
    validate_name(name)?;
    if balance.abs() >= BALANCE_LIMIT {
        return Err(ValidationError::BalanceOutOfRange);
    }
    if !fits_money_scale(balance) {
        return Err(ValidationError::TooManyDecimalPlaces);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_limit_is_ten_trillion() {
        assert_eq!(BALANCE_LIMIT, dec!(10000000000000));
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Checking"), Ok(()));
        assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
        assert_eq!(
            validate_name(&"n".repeat(101)),
            Err(ValidationError::NameTooLong { max: 100 })
        );
    }

    #[test]
    fn test_validate_account() {
        assert_eq!(validate_account("Checking", dec!(-250.00)), Ok(()));
        assert_eq!(validate_account("Checking", dec!(9999999999999.99)), Ok(()));
        assert_eq!(
            validate_account("Checking", dec!(10000000000000)),
            Err(ValidationError::BalanceOutOfRange)
        );
        assert_eq!(
            validate_account("", dec!(0)),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            validate_account("Checking", dec!(10.125)),
            Err(ValidationError::TooManyDecimalPlaces)
        );
    }
}
