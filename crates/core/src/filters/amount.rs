use std::str::FromStr;

use rust_decimal::Decimal;

use super::FilterParseError;

/// Transaction amount buckets.
///
/// Buckets partition positive amounts with an exclusive lower and an
/// inclusive upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountRange {
    /// `(0, 50]`
    UpTo50,
    /// `(50, 100]`
    From50To100,
    /// `(100, 500]`
    From100To500,
    /// `(500, 1000]`
    From500To1000,
    /// `(1000, ∞)`
    Over1000,
}

impl AmountRange {
    /// All buckets in ascending order.
    pub const ALL: [Self; 5] = [
        Self::UpTo50,
        Self::From50To100,
        Self::From100To500,
        Self::From500To1000,
        Self::Over1000,
    ];

    /// Query-string key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::UpTo50 => "0-50",
            Self::From50To100 => "50-100",
            Self::From100To500 => "100-500",
            Self::From500To1000 => "500-1000",
            Self::Over1000 => "1000+",
        }
    }

    /// `(exclusive lower, inclusive upper)`; `None` means unbounded.
    #[must_use]
    pub fn bounds(self) -> (Option<Decimal>, Option<Decimal>) {
        let (lo, hi) = match self {
            Self::UpTo50 => (0, Some(50)),
            Self::From50To100 => (50, Some(100)),
            Self::From100To500 => (100, Some(500)),
            Self::From500To1000 => (500, Some(1000)),
            Self::Over1000 => (1000, None),
        };
        (Some(Decimal::from(lo)), hi.map(Decimal::from))
    }

    /// True if `amount` falls in this bucket.
    #[must_use]
    pub fn contains(self, amount: Decimal) -> bool {
        let (lo, hi) = self.bounds();
        lo.is_none_or(|lo| amount > lo) && hi.is_none_or(|hi| amount <= hi)
    }

    /// Bucket for a positive amount.
    #[must_use]
    pub fn for_amount(amount: Decimal) -> Option<Self> {
        Self::ALL.into_iter().find(|range| range.contains(amount))
    }
}

impl FromStr for AmountRange {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.key() == s)
            .ok_or_else(|| FilterParseError::new("amount_range", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0.01), AmountRange::UpTo50)]
    #[case(dec!(50), AmountRange::UpTo50)]
    #[case(dec!(50.01), AmountRange::From50To100)]
    #[case(dec!(100), AmountRange::From50To100)]
    #[case(dec!(499.99), AmountRange::From100To500)]
    #[case(dec!(1000), AmountRange::From500To1000)]
    #[case(dec!(1000.01), AmountRange::Over1000)]
    fn test_bucket_edges(#[case] amount: Decimal, #[case] expected: AmountRange) {
        assert_eq!(AmountRange::for_amount(amount), Some(expected));
    }

    #[test]
    fn test_zero_is_outside_every_bucket() {
        assert_eq!(AmountRange::for_amount(Decimal::ZERO), None);
    }

    #[test]
    fn test_parse_keys() {
        for range in AmountRange::ALL {
            assert_eq!(range.key().parse::<AmountRange>(), Ok(range));
        }
        assert!("10-20".parse::<AmountRange>().is_err());
    }

    proptest! {
        #[test]
        fn test_buckets_partition_positive_amounts(cents in 1i64..10_000_000i64) {
            let amount = Decimal::new(cents, 2);
            let hits = AmountRange::ALL.iter().filter(|r| r.contains(amount)).count();
            prop_assert_eq!(hits, 1);
        }
    }
}
