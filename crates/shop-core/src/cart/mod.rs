//! Shopping cart module.
//!
//! Contains cart line types, the cart store, and pricing.

mod cart;
mod pricing;
mod store;

pub use cart::{CartEntry, CartLine, CartLineChange, CartView, MAX_QUANTITY_PER_LINE};
pub use pricing::{default_tax_rate, OrderSummary, PricedLine, PricingCalculator, DEFAULT_SHIPPING};
pub use store::{CartRepository, CartService, InMemoryCartRepository};
