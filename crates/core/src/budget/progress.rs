//! Budget progress evaluation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{BudgetProgress, BudgetSnapshot, BudgetStatus};

/// Ratio above which a budget is in the warning band (0.8).
pub const WARNING_RATIO: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Unclamped `spent / total`; zero when `total` is zero.
#[must_use]
pub fn spend_ratio(total_amount: Decimal, spent_amount: Decimal) -> Decimal {
    if total_amount.is_zero() {
        Decimal::ZERO
    } else {
        spent_amount / total_amount
    }
}

/// Unclamped spend percentage; zero when `total` is zero.
#[must_use]
pub fn raw_percentage(total_amount: Decimal, spent_amount: Decimal) -> Decimal {
    spend_ratio(total_amount, spent_amount) * Decimal::ONE_HUNDRED
}

/// Display percentage: `min(spent / total * 100, 100)`, or zero for a zero total.
#[must_use]
pub fn compute_percentage(total_amount: Decimal, spent_amount: Decimal) -> Decimal {
    raw_percentage(total_amount, spent_amount).min(Decimal::ONE_HUNDRED)
}

/// Classifies a budget. First match wins:
///
/// 1. `end_date < today` is `Ended`
/// 2. `spent > total > 0` is `Over`
/// 3. `spent / total > 0.8` with `total > 0` is `Warning`
/// 4. anything else is `OnTrack`
///
/// A zero total never leaves `OnTrack` (unless ended), even with positive spend.
#[must_use]
pub fn classify_status(
    total_amount: Decimal,
    spent_amount: Decimal,
    end_date: NaiveDate,
    today: NaiveDate,
) -> BudgetStatus {
    if end_date < today {
        return BudgetStatus::Ended;
    }

    if total_amount > Decimal::ZERO {
        if spent_amount > total_amount {
            return BudgetStatus::Over;
        }
        if spend_ratio(total_amount, spent_amount) > WARNING_RATIO {
            return BudgetStatus::Warning;
        }
    }

    BudgetStatus::OnTrack
}

impl BudgetProgress {
    /// Evaluates a budget snapshot as of `today`.
    #[must_use]
    pub fn evaluate(budget: &BudgetSnapshot, today: NaiveDate) -> Self {
        let raw = raw_percentage(budget.total_amount, budget.spent_amount);

        Self {
            percentage: raw.min(Decimal::ONE_HUNDRED),
            raw_percentage: raw,
            remaining: budget.total_amount - budget.spent_amount,
            status: classify_status(
                budget.total_amount,
                budget.spent_amount,
                budget.end_date,
                today,
            ),
            is_active: budget.contains_date(today),
        }
    }

    /// Copy with percentages rounded to two decimal places for presentation.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            percentage: self.percentage.round_dp(2),
            raw_percentage: self.raw_percentage.round_dp(2),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn snapshot(total: Decimal, spent: Decimal, end: NaiveDate) -> BudgetSnapshot {
        BudgetSnapshot {
            total_amount: total,
            spent_amount: spent,
            start_date: today() - Duration::days(1),
            end_date: end,
        }
    }

    #[test]
    fn test_warning_ratio_constant() {
        assert_eq!(WARNING_RATIO, dec!(0.8));
    }

    #[test]
    fn test_seventy_five_percent_on_track() {
        let budget = snapshot(dec!(200.00), dec!(150.00), today() + Duration::days(30));
        let progress = BudgetProgress::evaluate(&budget, today());

        assert_eq!(progress.percentage, dec!(75));
        assert_eq!(progress.raw_percentage, dec!(75));
        assert_eq!(progress.remaining, dec!(50.00));
        assert_eq!(progress.status, BudgetStatus::OnTrack);
        assert!(progress.is_active);
    }

    #[test]
    fn test_over_budget_clamps_display_only() {
        let budget = snapshot(dec!(100.00), dec!(120.00), today() + Duration::days(30));
        let progress = BudgetProgress::evaluate(&budget, today());

        assert_eq!(progress.percentage, dec!(100));
        assert_eq!(progress.raw_percentage, dec!(120));
        assert_eq!(progress.remaining, dec!(-20.00));
        assert_eq!(progress.status, BudgetStatus::Over);
    }

    #[test]
    fn test_minimal_total_zero_spend() {
        let budget = snapshot(dec!(0.01), dec!(0.00), today() + Duration::days(30));
        let progress = BudgetProgress::evaluate(&budget, today());

        assert_eq!(progress.percentage, Decimal::ZERO);
        assert_eq!(progress.status, BudgetStatus::OnTrack);
    }

    #[test]
    fn test_ended_takes_precedence() {
        let budget = snapshot(dec!(100.00), dec!(50.00), today() - Duration::days(1));
        let progress = BudgetProgress::evaluate(&budget, today());

        assert_eq!(progress.status, BudgetStatus::Ended);
        assert!(!progress.is_active);
    }

    #[test]
    fn test_zero_total_with_spend_is_not_over() {
        assert_eq!(compute_percentage(dec!(0), dec!(500)), Decimal::ZERO);
        assert_eq!(
            classify_status(dec!(0), dec!(500), today(), today()),
            BudgetStatus::OnTrack
        );
    }

    #[test]
    fn test_last_day_is_not_ended() {
        assert_eq!(
            classify_status(dec!(100), dec!(10), today(), today()),
            BudgetStatus::OnTrack
        );
    }

    #[test]
    fn test_future_budget_is_not_active() {
        let budget = BudgetSnapshot {
            total_amount: dec!(100),
            spent_amount: dec!(0),
            start_date: today() + Duration::days(1),
            end_date: today() + Duration::days(10),
        };
        let progress = BudgetProgress::evaluate(&budget, today());

        assert!(!progress.is_active);
        assert_eq!(progress.status, BudgetStatus::OnTrack);
    }

    #[test]
    fn test_rounded_for_display() {
        let budget = snapshot(dec!(3), dec!(1), today());
        let progress = BudgetProgress::evaluate(&budget, today()).rounded();

        assert_eq!(progress.percentage, dec!(33.33));
        assert_eq!(progress.raw_percentage, dec!(33.33));
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&BudgetStatus::OnTrack).unwrap();
        assert_eq!(json, "\"ON_TRACK\"");
        assert_eq!(BudgetStatus::OnTrack.to_string(), "ON TRACK");
    }
}
