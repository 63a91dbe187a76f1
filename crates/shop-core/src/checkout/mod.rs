//! Checkout module.
//!
//! Contains orders, order ids, the order store, and the checkout flow.

mod flow;
mod order;
pub mod order_id;
mod payment;
mod shipping;
mod store;

pub use flow::{CheckoutRequest, CheckoutService, OrderConfirmation};
pub use order::{Order, OrderLineSnapshot, OrderStatus, OrderSummaryView};
pub use order_id::{generate_order_id, OrderIdSource, RandomOrderIds, SeededOrderIds};
pub use payment::{PaymentInfo, PaymentMethod};
pub use shipping::ShippingInfo;
pub use store::{InMemoryOrderStore, OrderStore};
