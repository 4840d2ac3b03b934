//! Budget data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The fields of a stored budget the evaluator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    /// Budgeted ceiling.
    pub total_amount: Decimal,
    /// Accumulated spend.
    pub spent_amount: Decimal,
    /// First day of the budget (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the budget (inclusive).
    pub end_date: NaiveDate,
}

impl BudgetSnapshot {
    /// Returns true if `date` falls within the budget period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Status band of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    /// Spend at or below 80% of the total.
    OnTrack,
    /// Spend above 80% but not above the total.
    Warning,
    /// Spend above the total.
    Over,
    /// The period is over; spend no longer matters.
    Ended,
}

impl BudgetStatus {
    /// Human-readable label, as shown on status badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "ON TRACK",
            Self::Warning => "WARNING",
            Self::Over => "OVER",
            Self::Ended => "ENDED",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Evaluated progress of a budget at a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetProgress {
    /// Spend as a percentage of the total, clamped to 100.
    pub percentage: Decimal,
    /// Spend as a percentage of the total, unclamped.
    pub raw_percentage: Decimal,
    /// `total - spent`; negative when over budget.
    pub remaining: Decimal,
    /// Status band.
    pub status: BudgetStatus,
    /// True while `start_date <= today <= end_date`.
    pub is_active: bool,
}
