//! Type-safe price representation using decimal arithmetic.
//!
//! The shop is currency-agnostic: a [`Price`] is a plain non-negative
//! decimal amount in whatever unit the catalog uses. Totals are exact
//! (no floating point), and a whole-number price formats without a
//! decimal point (`Price::from(900)` displays as `900`).

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-negative, currency-agnostic price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity, returning `None` on overflow.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Whether the amount is negative (invalid for a catalog price).
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_whole_number() {
        assert_eq!(Price::from(250).to_string(), "250");
        assert_eq!(Price::ZERO.to_string(), "0");
    }

    #[test]
    fn test_display_fractional() {
        let price = Price::new(Decimal::new(1250, 2)); // 12.50
        assert_eq!(price.to_string(), "12.5");
    }

    #[test]
    fn test_line_total() {
        let price = Price::from(250);
        assert_eq!(price.line_total(2), Some(Price::from(500)));
        assert_eq!(price.line_total(0), Some(Price::ZERO));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from(500), Price::from(400)].into_iter().sum();
        assert_eq!(total, Price::from(900));
        assert_eq!(total.to_string(), "900");
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::from(-1).is_negative());
        assert!(!Price::ZERO.is_negative());
        assert!(!Price::from(1).is_negative());
    }

    #[test]
    fn test_serde_roundtrip() {
        let price = Price::from(250);
        let json = serde_json::to_string(&price).expect("serialize");
        let back: Price = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, price);
    }
}
