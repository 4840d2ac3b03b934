//! Deposits, withdrawals, and the totals derived from them.

pub mod error;
pub mod summary;
pub mod types;

pub use error::TransactionError;
pub use summary::{CategorySpending, TransactionSummary};
pub use types::{MAX_DESCRIPTION_LEN, TransactionType, validate_transaction};
