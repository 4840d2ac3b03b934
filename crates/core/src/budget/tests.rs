//! Property-based tests for the budget progress evaluator.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::progress::{classify_status, compute_percentage, raw_percentage};
use super::types::{BudgetProgress, BudgetSnapshot, BudgetStatus};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

/// Amounts in cents, as stored in `NUMERIC(10,2)`.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    /// For total > 0: percentage == min(spent / total * 100, 100)
    #[test]
    fn test_percentage_matches_clamped_ratio(
        total in positive_amount_strategy(),
        spent in amount_strategy(),
    ) {
        let expected = (spent / total * dec!(100)).min(dec!(100));
        prop_assert_eq!(compute_percentage(total, spent), expected);
        prop_assert!(compute_percentage(total, spent) <= dec!(100));
        prop_assert!(compute_percentage(total, spent) >= Decimal::ZERO);
    }

    /// Zero total never divides and always yields 0.
    #[test]
    fn test_zero_total_percentage(spent in amount_strategy()) {
        prop_assert_eq!(compute_percentage(Decimal::ZERO, spent), Decimal::ZERO);
        prop_assert_eq!(raw_percentage(Decimal::ZERO, spent), Decimal::ZERO);
    }

    /// Ended budgets are ENDED regardless of spend.
    #[test]
    fn test_ended_precedence(
        total in amount_strategy(),
        spent in amount_strategy(),
        days_ago in 1i64..3650,
    ) {
        let end = today() - Duration::days(days_ago);
        prop_assert_eq!(classify_status(total, spent, end, today()), BudgetStatus::Ended);
    }

    /// Non-ended budgets land in the band implied by the ratio.
    #[test]
    fn test_status_bands(
        total in positive_amount_strategy(),
        spent in amount_strategy(),
        days_left in 0i64..3650,
    ) {
        let end = today() + Duration::days(days_left);
        let status = classify_status(total, spent, end, today());
        let ratio = spent / total;

        if spent > total {
            prop_assert_eq!(status, BudgetStatus::Over);
        } else if ratio > dec!(0.8) {
            prop_assert_eq!(status, BudgetStatus::Warning);
        } else {
            prop_assert_eq!(status, BudgetStatus::OnTrack);
        }
    }

    /// Raw percentage exceeds 100 exactly when the budget is over.
    #[test]
    fn test_raw_percentage_detects_over(
        total in positive_amount_strategy(),
        spent in amount_strategy(),
    ) {
        let snapshot = BudgetSnapshot {
            total_amount: total,
            spent_amount: spent,
            start_date: today(),
            end_date: today(),
        };
        let progress = BudgetProgress::evaluate(&snapshot, today());

        prop_assert_eq!(progress.status == BudgetStatus::Over, spent > total);
        prop_assert_eq!(progress.remaining, total - spent);
        prop_assert!(progress.is_active);
    }
}

#[rstest]
#[case::on_track(dec!(200.00), dec!(150.00), 30, BudgetStatus::OnTrack)]
#[case::exactly_eighty(dec!(100.00), dec!(80.00), 30, BudgetStatus::OnTrack)]
#[case::just_above_eighty(dec!(100.00), dec!(80.01), 30, BudgetStatus::Warning)]
#[case::exactly_full(dec!(100.00), dec!(100.00), 30, BudgetStatus::Warning)]
#[case::over(dec!(100.00), dec!(120.00), 30, BudgetStatus::Over)]
#[case::tiny_total(dec!(0.01), dec!(0.00), 30, BudgetStatus::OnTrack)]
#[case::zero_total_spent(dec!(0.00), dec!(25.00), 30, BudgetStatus::OnTrack)]
#[case::ended(dec!(100.00), dec!(50.00), -1, BudgetStatus::Ended)]
#[case::ended_over(dec!(100.00), dec!(500.00), -1, BudgetStatus::Ended)]
#[case::last_day(dec!(100.00), dec!(90.00), 0, BudgetStatus::Warning)]
fn test_status_table(
    #[case] total: Decimal,
    #[case] spent: Decimal,
    #[case] days_until_end: i64,
    #[case] expected: BudgetStatus,
) {
    let end = today() + Duration::days(days_until_end);
    assert_eq!(classify_status(total, spent, end, today()), expected);
}

#[rstest]
#[case(dec!(200.00), dec!(150.00), dec!(75.0))]
#[case(dec!(0.01), dec!(0.00), dec!(0.0))]
#[case(dec!(100.00), dec!(120.00), dec!(100))]
#[case(dec!(0), dec!(10), dec!(0))]
fn test_percentage_table(
    #[case] total: Decimal,
    #[case] spent: Decimal,
    #[case] expected: Decimal,
) {
    assert_eq!(compute_percentage(total, spent), expected);
}
