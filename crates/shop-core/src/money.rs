//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. The store works in a
//! single currency, so no currency tag is carried.

use crate::error::CommerceError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Currency symbol used for display.
pub const CURRENCY_SYMBOL: &str = "$";

/// A monetary value in cents.
///
/// Serializes as a 2-decimal string (`"54.57"`) and accepts strings or JSON
/// numbers on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    /// Create a new Money value from cents.
    pub const fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a zero amount.
    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// Create a Money value from a decimal amount, rounding half-up to cents.
    ///
    /// ```
    /// use rust_decimal::Decimal;
    /// use shop_core::money::Money;
    /// let price = Money::from_decimal(Decimal::new(4999, 2)).unwrap();
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Result<Self, CommerceError> {
        let cents = (amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(CommerceError::Overflow)?;
        Ok(Self::new(cents))
    }

    /// Convert to a decimal value with two places.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount_cents, 2)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", CURRENCY_SYMBOL, self.to_decimal())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        self.to_decimal().to_string()
    }

    /// Add another Money value, returning None on overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        self.amount_cents.checked_add(other.amount_cents).map(Money::new)
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents.checked_mul(factor).map(Money::new)
    }

    /// Apply a decimal rate (e.g. `0.08` for 8%), rounding half-up to cents.
    pub fn try_apply_rate(&self, rate: Decimal) -> Option<Money> {
        Decimal::from(self.amount_cents)
            .checked_mul(rate)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Money::new)
    }

    /// Sum an iterator of Money values, returning None on overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>) -> Option<Money> {
        iter.try_fold(Money::zero(), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_decimal(amount).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(Decimal::new(1999, 2)).unwrap();
        assert_eq!(m.amount_cents, 1999);

        // 0.125 rounds half-up to 0.13
        let m = Money::from_decimal(Decimal::new(125, 3)).unwrap();
        assert_eq!(m.amount_cents, 13);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999).display(), "$49.99");
        assert_eq!(Money::new(500).display(), "$5.00");
        assert_eq!(Money::new(5).display_amount(), "0.05");
    }

    #[test]
    fn test_money_multiply() {
        assert_eq!(Money::new(1999).try_multiply(2), Some(Money::new(3998)));
        assert_eq!(Money::new(i64::MAX).try_multiply(2), None);
    }

    #[test]
    fn test_money_add_is_checked() {
        assert_eq!(Money::new(1999).try_add(&Money::new(1)), Some(Money::new(2000)));
        assert_eq!(Money::new(i64::MAX).try_add(&Money::new(1)), None);
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // 8% of 44.98 = 3.5984
        assert_eq!(
            Money::new(4498).try_apply_rate(Decimal::new(8, 2)),
            Some(Money::new(360))
        );
        // 10% of 0.05 = 0.005 -> 0.01
        assert_eq!(
            Money::new(5).try_apply_rate(Decimal::new(10, 2)),
            Some(Money::new(1))
        );
    }

    #[test]
    fn test_try_sum() {
        let values = [Money::new(100), Money::new(250)];
        assert_eq!(Money::try_sum(values.iter()), Some(Money::new(350)));

        let overflow = [Money::new(i64::MAX), Money::new(1)];
        assert_eq!(Money::try_sum(overflow.iter()), None);
    }

    #[test]
    fn test_money_serde() {
        let json = serde_json::to_string(&Money::new(5457)).unwrap();
        assert_eq!(json, "\"54.57\"");

        let parsed: Money = serde_json::from_str("19.99").unwrap();
        assert_eq!(parsed, Money::new(1999));

        let parsed: Money = serde_json::from_str("\"5.00\"").unwrap();
        assert_eq!(parsed, Money::new(500));
    }

    #[test]
    fn test_money_serde_in_struct() {
        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Line {
            unit_price: Money,
        }

        let line: Line = serde_json::from_str(r#"{"unit_price":"0.125"}"#).unwrap();
        assert_eq!(line.unit_price, Money::new(13));
        assert_eq!(
            serde_json::to_string(&line).unwrap(),
            r#"{"unit_price":"0.13"}"#
        );
        assert!(serde_json::from_str::<Line>(r#"{"unit_price":"abc"}"#).is_err());
    }
}
