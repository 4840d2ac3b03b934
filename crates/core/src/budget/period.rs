//! Budget period arithmetic.

use chrono::{Days, NaiveDate};

use super::service::MAX_NAME_LEN;

/// Days added by the "extend" admin action.
pub const DEFAULT_EXTENSION_DAYS: u64 = 30;

/// Moves an end date forward by `days`.
///
/// Saturates at `NaiveDate::MAX` instead of overflowing.
#[must_use]
pub fn extend_end_date(end_date: NaiveDate, days: u64) -> NaiveDate {
    end_date
        .checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

/// The period immediately following `[start_date, end_date]` with the same length.
///
/// The new period starts the day after `end_date`.
#[must_use]
pub fn next_period(start_date: NaiveDate, end_date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let duration = end_date - start_date;
    let new_start = end_date.succ_opt().unwrap_or(NaiveDate::MAX);
    let new_end = new_start
        .checked_add_signed(duration)
        .unwrap_or(NaiveDate::MAX);
    (new_start, new_end)
}

/// Name given to a duplicated budget, truncated to fit the name column.
#[must_use]
pub fn duplicate_name(name: &str) -> String {
    const SUFFIX: &str = " (Copy)";
    let base: String = name.chars().take(MAX_NAME_LEN - SUFFIX.len()).collect();
    format!("{base}{SUFFIX}")
}
