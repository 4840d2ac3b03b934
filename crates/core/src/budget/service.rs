//! Budget validation rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::BudgetError;

/// Maximum length of a budget name.
pub const MAX_NAME_LEN: usize = 100;

/// Exclusive upper bound of a `NUMERIC(10,2)` column.
pub const BUDGET_AMOUNT_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Decimal places stored for money columns.
pub const MONEY_SCALE: u32 = 2;

/// True when `amount` has no digits past the cent.
#[must_use]
pub fn fits_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Validates the writable fields of a budget.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: empty or overlong name, negative or
    /// oversized amounts, or a start date after the end date.
    pub fn validate(
        name: &str,
        total_amount: Decimal,
        spent_amount: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), BudgetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BudgetError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(BudgetError::NameTooLong { max: MAX_NAME_LEN });
        }

        for amount in [total_amount, spent_amount] {
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(BudgetError::NegativeAmount);
            }
            if amount >= BUDGET_AMOUNT_LIMIT {
                return Err(BudgetError::AmountOutOfRange);
            }
            if !fits_money_scale(amount) {
                return Err(BudgetError::TooManyDecimalPlaces);
            }
        }

        if start_date > end_date {
            return Err(BudgetError::InvalidDateRange);
        }

        Ok(())
    }
}
