use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

/// Money amount represented as **integer minor units** (cents).
///
/// Use this type for every monetary value in the engine (expense amounts,
/// totals) to avoid floating-point drift when summing.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Largest amount a single expense may carry (ten billion in major
    /// units). Keeps any realistic `SUM` far from `i64::MAX`.
    pub const MAX_EXPENSE: MoneyCents = MoneyCents(1_000_000_000_000);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Converts a decimal amount in major units (`12.5` is 1250 cents).
    ///
    /// Returns `None` when the amount has more than two decimal places or
    /// does not fit in `i64` cents.
    #[must_use]
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let cents = amount.checked_mul(Decimal::ONE_HUNDRED)?;
        if !cents.fract().is_zero() {
            return None;
        }
        cents.to_i64().map(Self)
    }

    /// Major units with two decimal places.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn decimal_conversion_keeps_cents() {
        let amount = MoneyCents::from_decimal(Decimal::new(125, 1)).unwrap();
        assert_eq!(amount.cents(), 1250);
        assert_eq!(amount.to_decimal(), Decimal::new(1250, 2));
        assert_eq!(
            MoneyCents::from_decimal(Decimal::new(1_000, 3)),
            Some(MoneyCents::new(100))
        );
    }

    #[test]
    fn sub_cent_decimals_are_rejected() {
        assert_eq!(MoneyCents::from_decimal(Decimal::new(12_345, 3)), None);
        assert_eq!(MoneyCents::from_decimal(Decimal::MAX), None);
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        let total: MoneyCents = std::iter::empty().sum();
        assert_eq!(total, MoneyCents::ZERO);
    }

    #[test]
    fn sum_adds_cents() {
        let total: MoneyCents = [1000, 2000, 500].into_iter().map(MoneyCents::new).sum();
        assert_eq!(total.cents(), 3500);
    }
}
