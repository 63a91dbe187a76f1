//! Cart-to-order pipeline for the shop backend.
//!
//! This crate turns a user's shopping cart into a placed order:
//!
//! - **Catalog**: Product lookup the cart depends on
//! - **Cart**: Per-user cart lines, cart views, pricing
//! - **Checkout**: Order ids, order store, the checkout flow
//! - **Storefront**: Authenticated operations wrapped in response envelopes
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_core::prelude::*;
//!
//! let catalog = InMemoryCatalog::with_products([
//!     Product::new("book", "Rust Book", Money::new(1999)),
//! ]);
//! let shop = Storefront::in_memory(Arc::new(catalog), &ShopConfig::default())?;
//!
//! let alice = UserId::new("alice");
//! shop.add_to_cart(Some(&alice), AddToCart { product_id: "book".into(), quantity: 2 }).await;
//!
//! let placed = shop
//!     .place_order(Some(&alice), CheckoutRequest::new(ShippingInfo::new("Austin", "555-0101")))
//!     .await;
//! println!("Total: {}", placed.data.unwrap().total.display());
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod identity;
pub mod ids;
pub mod lock;
pub mod money;
pub mod response;
mod timeout;

pub mod catalog;
pub mod cart;
pub mod checkout;
pub mod storefront;

pub use config::ShopConfig;
pub use error::{CommerceError, ErrorKind};
pub use ids::*;
pub use money::Money;
pub use response::ApiResponse;
pub use storefront::Storefront;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::{CheckoutConfig, PricingConfig, ShopConfig};
    pub use crate::error::{CommerceError, ErrorKind};
    pub use crate::ids::*;
    pub use crate::money::Money;
    pub use crate::response::{ApiError, ApiResponse};

    // Catalog
    pub use crate::catalog::{Catalog, InMemoryCatalog, Product};

    // Cart
    pub use crate::cart::{
        CartEntry, CartLineChange, CartRepository, CartService, CartView, InMemoryCartRepository,
        OrderSummary, PricedLine, PricingCalculator,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutRequest, CheckoutService, InMemoryOrderStore, Order, OrderConfirmation,
        OrderIdSource, OrderLineSnapshot, OrderStatus, OrderStore, OrderSummaryView, PaymentInfo,
        PaymentMethod, RandomOrderIds, SeededOrderIds, ShippingInfo,
    };

    // Storefront
    pub use crate::storefront::{AddToCart, RemovedItem, Storefront, StorefrontBuilder};

    pub use std::sync::Arc;
}
