//! Transaction error types.

use thiserror::Error;

/// Transaction validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// Amount is zero or negative.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Amount does not fit `NUMERIC(10,2)`.
    #[error("Amount exceeds the allowed precision")]
    AmountOutOfRange,

    /// Amount has more than two decimal places.
    #[error("Ensure that there are no more than 2 decimal places")]
    TooManyDecimalPlaces,

    /// Description exceeds the column width.
    #[error("Description cannot exceed {max} characters")]
    DescriptionTooLong {
        /// Maximum allowed length.
        max: usize,
    },

    /// Type string is not `deposit` or `withdrawal`.
    #[error("Invalid transaction type: {0}. Must be one of: deposit, withdrawal")]
    UnknownType(String),
}
