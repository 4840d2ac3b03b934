use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};

use super::FilterParseError;

/// Relative date windows ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateRange {
    /// Today only.
    Today,
    /// Since Monday of the current week.
    Week,
    /// Since the first of the month.
    Month,
    /// Since the first day of the quarter.
    Quarter,
    /// Since January 1.
    Year,
}

impl DateRange {
    /// All windows, narrowest first.
    pub const ALL: [Self; 5] = [
        Self::Today,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::Year,
    ];

    /// Query-string key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// First date (inclusive) of the window containing `today`.
    #[must_use]
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Today => today,
            Self::Week => today
                .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_monday())))
                .unwrap_or(today),
            Self::Month => today.with_day(1).unwrap_or(today),
            Self::Quarter => {
                let month = (today.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), month, 1).unwrap_or(today)
            }
            Self::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        }
    }
}

impl FromStr for DateRange {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.key() == s)
            .ok_or_else(|| FilterParseError::new("date_range", s))
    }
}
