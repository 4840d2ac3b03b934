//! Budget progress tracking.
//!
//! The progress evaluator turns a budget snapshot into a display percentage
//! and a status band. Everything here is pure and stateless; callers pass
//! `today` explicitly so results are reproducible.

pub mod error;
pub mod period;
pub mod progress;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use progress::{classify_status, compute_percentage, raw_percentage, spend_ratio};
pub use service::BudgetService;
pub use types::{BudgetProgress, BudgetSnapshot, BudgetStatus};
