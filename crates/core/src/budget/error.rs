//! Budget error types.

use thiserror::Error;

/// Budget validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// Name is empty.
    #[error("Budget name is required")]
    EmptyName,

    /// Name exceeds the column width.
    #[error("Budget name cannot exceed {max} characters")]
    NameTooLong {
        /// Maximum allowed length.
        max: usize,
    },

    /// Total or spent amount is negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Amount does not fit `NUMERIC(10,2)`.
    #[error("Amount exceeds the allowed precision")]
    AmountOutOfRange,

    /// Amount has more than two decimal places.
    #[error("Ensure that there are no more than 2 decimal places")]
    TooManyDecimalPlaces,

    /// Start date falls after end date.
    #[error("Start date must be on or before end date")]
    InvalidDateRange,
}
