//! Cart line types.

use crate::cart::PricedLine;
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{ProductId, UserId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// A stored cart line: one product in one user's cart.
///
/// Unique per `(user_id, product_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Owner of the cart.
    pub user_id: UserId,
    /// Product in the cart.
    pub product_id: ProductId,
    /// Quantity, always at least 1.
    pub quantity: i64,
    /// When the line was first added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Create a new line after validating the quantity.
    pub fn new(
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
        added_at: DateTime<Utc>,
    ) -> Result<Self, CommerceError> {
        validate_quantity(quantity)?;
        Ok(Self {
            user_id,
            product_id,
            quantity,
            added_at,
        })
    }

    /// Increase the quantity, keeping it within bounds.
    pub fn increment(&mut self, by: i64) -> Result<(), CommerceError> {
        let new_quantity = self
            .quantity
            .checked_add(by)
            .ok_or(CommerceError::Overflow)?;
        validate_quantity(new_quantity)?;
        self.quantity = new_quantity;
        Ok(())
    }
}

/// Reject quantities outside `1..=MAX_QUANTITY_PER_LINE`.
pub(crate) fn validate_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity < 1 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_LINE {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_LINE,
        ));
    }
    Ok(())
}

/// A cart line joined with current catalog data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    /// Product ID.
    pub product_id: ProductId,
    /// Current product name.
    pub name: String,
    /// Current product description.
    pub description: String,
    /// Current unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// `unit_price * quantity`.
    pub line_total: Money,
    /// When the line was first added.
    pub added_at: DateTime<Utc>,
}

impl CartEntry {
    /// Join a stored line with its product.
    pub fn join(line: &CartLine, product: &Product) -> Result<Self, CommerceError> {
        let line_total = crate::cart::PricingCalculator::line_total(product.price, line.quantity)?;
        Ok(Self {
            product_id: line.product_id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            unit_price: product.price,
            quantity: line.quantity,
            line_total,
            added_at: line.added_at,
        })
    }

    /// Price and quantity for the pricing calculator.
    pub fn priced(&self) -> PricedLine {
        PricedLine::new(self.unit_price, self.quantity)
    }
}

/// The full cart as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartView {
    /// Entries, most recently added first.
    pub items: Vec<CartEntry>,
    /// Sum of quantities.
    pub item_count: i64,
    /// Sum of line totals.
    pub subtotal: Money,
}

impl CartView {
    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of an add or update: the product's name and its final quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineChange {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Quantity after the change.
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i64) -> Result<CartLine, CommerceError> {
        CartLine::new(
            UserId::new("user-1"),
            ProductId::new("prod-1"),
            quantity,
            Utc::now(),
        )
    }

    #[test]
    fn test_invalid_quantity() {
        assert!(matches!(line(0), Err(CommerceError::InvalidQuantity(0))));
        assert!(matches!(line(-3), Err(CommerceError::InvalidQuantity(-3))));
    }

    #[test]
    fn test_quantity_limit() {
        assert!(matches!(
            line(MAX_QUANTITY_PER_LINE + 1),
            Err(CommerceError::QuantityExceedsLimit(_, _))
        ));
    }

    #[test]
    fn test_increment() {
        let mut l = line(1).unwrap();
        l.increment(3).unwrap();
        assert_eq!(l.quantity, 4);

        assert!(l.increment(MAX_QUANTITY_PER_LINE).is_err());
        assert_eq!(l.quantity, 4);
    }

    #[test]
    fn test_join() {
        let l = line(2).unwrap();
        let product = Product::new("prod-1", "Rust Book", Money::new(1999));
        let entry = CartEntry::join(&l, &product).unwrap();
        assert_eq!(entry.name, "Rust Book");
        assert_eq!(entry.line_total, Money::new(3998));
    }
}
