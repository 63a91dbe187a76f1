//! Cart pricing calculations.

use crate::config::PricingConfig;
use crate::error::CommerceError;
use crate::money::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat shipping charge applied to every order ($5.99).
pub const DEFAULT_SHIPPING: Money = Money::new(599);

/// Flat tax rate applied to the subtotal (8%).
pub fn default_tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

/// One priced line: unit price and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
}

impl PricedLine {
    pub fn new(unit_price: Money, quantity: i64) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }
}

/// Pricing breakdown for an order.
///
/// `total == subtotal + shipping + tax`; every amount is whole cents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderSummary {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping cost.
    pub shipping: Money,
    /// Tax on the subtotal.
    pub tax: Money,
    /// Grand total.
    pub total: Money,
}

/// Computes order totals from cart lines.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingCalculator {
    shipping: Money,
    tax_rate: Decimal,
}

impl Default for PricingCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_SHIPPING, default_tax_rate())
    }
}

impl PricingCalculator {
    /// Create a calculator with a flat shipping charge and tax rate.
    pub fn new(shipping: Money, tax_rate: Decimal) -> Self {
        Self { shipping, tax_rate }
    }

    /// Create a calculator from configuration.
    pub fn from_config(config: &PricingConfig) -> Result<Self, CommerceError> {
        Ok(Self::new(
            Money::from_decimal(config.shipping_flat)?,
            config.tax_rate,
        ))
    }

    /// Price of `quantity` units.
    pub fn line_total(unit_price: Money, quantity: i64) -> Result<Money, CommerceError> {
        if unit_price.is_negative() {
            return Err(CommerceError::InvalidPrice(unit_price.amount_cents));
        }
        if quantity < 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        unit_price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)
    }

    /// Sum of line totals.
    pub fn subtotal<I>(&self, lines: I) -> Result<Money, CommerceError>
    where
        I: IntoIterator<Item = PricedLine>,
    {
        lines.into_iter().try_fold(Money::zero(), |acc, line| {
            let line_total = Self::line_total(line.unit_price, line.quantity)?;
            acc.try_add(&line_total).ok_or(CommerceError::Overflow)
        })
    }

    /// Full breakdown: subtotal, shipping, tax on the subtotal, and total.
    ///
    /// An empty list prices to a zero subtotal; callers reject empty carts
    /// before they get here.
    pub fn calculate<I>(&self, lines: I) -> Result<OrderSummary, CommerceError>
    where
        I: IntoIterator<Item = PricedLine>,
    {
        let subtotal = self.subtotal(lines)?;
        let tax = subtotal
            .try_apply_rate(self.tax_rate)
            .ok_or(CommerceError::Overflow)?;
        let total = Money::try_sum([subtotal, self.shipping, tax].iter())
            .ok_or(CommerceError::Overflow)?;

        Ok(OrderSummary {
            subtotal,
            shipping: self.shipping,
            tax,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(pairs: &[(i64, i64)]) -> Vec<PricedLine> {
        pairs
            .iter()
            .map(|&(cents, qty)| PricedLine::new(Money::new(cents), qty))
            .collect()
    }

    #[test]
    fn test_reference_cart() {
        let summary = PricingCalculator::default()
            .calculate(lines(&[(1999, 2), (500, 1)]))
            .unwrap();

        assert_eq!(summary.subtotal, Money::new(4498));
        assert_eq!(summary.shipping, Money::new(599));
        assert_eq!(summary.tax, Money::new(360));
        assert_eq!(summary.total, Money::new(5457));
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let calc = PricingCalculator::default();
        for pairs in [
            vec![(1, 1)],
            vec![(333, 3), (1, 7)],
            vec![(12_345, 9), (0, 4), (99, 1)],
            vec![(6, 1)],
        ] {
            let s = calc.calculate(lines(&pairs)).unwrap();
            assert_eq!(
                s.total.amount_cents,
                s.subtotal.amount_cents + s.shipping.amount_cents + s.tax.amount_cents
            );
        }
    }

    #[test]
    fn test_order_does_not_matter() {
        let calc = PricingCalculator::default();
        let forward = calc.calculate(lines(&[(1999, 2), (500, 1), (7, 13)])).unwrap();
        let reversed = calc.calculate(lines(&[(7, 13), (500, 1), (1999, 2)])).unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_tax_excludes_shipping() {
        let calc = PricingCalculator::new(Money::new(10_000), Decimal::new(10, 2));
        let summary = calc.calculate(lines(&[(1000, 1)])).unwrap();
        assert_eq!(summary.tax, Money::new(100));
        assert_eq!(summary.total, Money::new(11_100));
    }

    #[test]
    fn test_empty_prices_to_shipping_only() {
        let summary = PricingCalculator::default().calculate(Vec::new()).unwrap();
        assert!(summary.subtotal.is_zero());
        assert!(summary.tax.is_zero());
        assert_eq!(summary.total, DEFAULT_SHIPPING);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let calc = PricingCalculator::default();
        assert!(matches!(
            calc.calculate(lines(&[(-1, 1)])),
            Err(CommerceError::InvalidPrice(-1))
        ));
        assert!(matches!(
            calc.calculate(lines(&[(100, -2)])),
            Err(CommerceError::InvalidQuantity(-2))
        ));
    }

    #[test]
    fn test_overflow() {
        let calc = PricingCalculator::default();
        assert!(matches!(
            calc.calculate(lines(&[(i64::MAX, 2)])),
            Err(CommerceError::Overflow)
        ));
    }
}
