//! List filters used by the admin views.
//!
//! Each filter parses from the query-string key the admin surface exposes
//! and knows how to test or bound a value.

mod amount;
mod date;
mod status;

pub use amount::AmountRange;
pub use date::DateRange;
pub use status::BudgetStatusFilter;

use thiserror::Error;

/// Unknown filter key.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown {filter} filter value: {value}")]
pub struct FilterParseError {
    /// Filter name.
    pub filter: &'static str,
    /// Rejected value.
    pub value: String,
}

impl FilterParseError {
    pub(crate) fn new(filter: &'static str, value: &str) -> Self {
        Self {
            filter,
            value: value.to_string(),
        }
    }
}
