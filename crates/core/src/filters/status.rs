use std::str::FromStr;

use crate::budget::{BudgetProgress, BudgetStatus};

use super::FilterParseError;

/// Admin budget list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetStatusFilter {
    /// Status is `ON_TRACK`.
    OnTrack,
    /// Status is `WARNING`.
    Warning,
    /// Status is `OVER`.
    Over,
    /// Today lies within the budget's date range.
    Active,
    /// Status is `ENDED`.
    Ended,
}

impl BudgetStatusFilter {
    /// All filters.
    pub const ALL: [Self; 5] = [
        Self::OnTrack,
        Self::Warning,
        Self::Over,
        Self::Active,
        Self::Ended,
    ];

    /// Query-string key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::Warning => "warning",
            Self::Over => "over",
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }

    /// True if the evaluated budget passes this filter.
    #[must_use]
    pub fn matches(self, progress: &BudgetProgress) -> bool {
        match self {
            Self::OnTrack => progress.status == BudgetStatus::OnTrack,
            Self::Warning => progress.status == BudgetStatus::Warning,
            Self::Over => progress.status == BudgetStatus::Over,
            Self::Ended => progress.status == BudgetStatus::Ended,
            Self::Active => progress.is_active,
        }
    }
}

impl FromStr for BudgetStatusFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.key() == s)
            .ok_or_else(|| FilterParseError::new("status", s))
    }
}
