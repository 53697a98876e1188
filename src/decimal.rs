//! Currency amounts rounded to 2 decimal places.
//!
//! Simulation state is kept at full `rust_decimal` precision; `Money` is the
//! type every recorded figure is converted to, so rounding happens once, at
//! the point a month is written into the schedule.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// A currency amount with exactly 2 decimal places.
///
/// Midpoints round away from zero, matching common currency display.
/// Addition and subtraction saturate at the `Decimal` bounds.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use payoff_engine::Money;
///
/// let amount = Money::from_str("10.005").unwrap();
/// assert_eq!(amount.to_string(), "10.01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Rounds a full-precision value to cents.
    pub fn round(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Money(rounded)
    }

    /// Returns the underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::round(value)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Money::round(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::round(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::round(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(Money::round(dec!(1.666666)).to_string(), "1.67");
        assert_eq!(Money::round(dec!(2.083333)).to_string(), "2.08");
        assert_eq!(Money::round(dec!(12)).to_string(), "12.00");
    }

    #[test]
    fn test_sum_saturates_instead_of_overflowing() {
        let big = Money::round(Decimal::MAX - dec!(10));
        let total: Money = [big, Money::round(dec!(100))].into_iter().sum();
        assert_eq!(total.as_decimal(), Decimal::MAX);
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(Money::round(dec!(0.125)).to_string(), "0.13");
        assert_eq!(Money::round(dec!(-0.125)).to_string(), "-0.13");
    }

    #[test]
    fn test_from_str_trims_and_rounds() {
        let m = Money::from_str("  61.6666  ").unwrap();
        assert_eq!(m.to_string(), "61.67");
        assert!(Money::from_str("abc").is_err());
    }

    #[test]
    fn test_sum_of_amounts() {
        let total: Money = [dec!(1.10), dec!(2.20), dec!(3.30)]
            .into_iter()
            .map(Money::round)
            .sum();
        assert_eq!(total.to_string(), "6.60");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::round(dec!(1012))).unwrap();
        assert_eq!(json, "\"1012.00\"");
    }
}
