//! Order types.

use crate::cart::{CartEntry, OrderSummary};
use crate::checkout::{PaymentInfo, ShippingInfo};
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Check if fulfilment may move an order from this status to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (_, OrderStatus::Cancelled) => self.can_cancel(),
            (OrderStatus::Pending, OrderStatus::Processing)
            | (OrderStatus::Processing, OrderStatus::Shipped)
            | (OrderStatus::Shipped, OrderStatus::Delivered) => true,
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of an order, frozen at checkout.
///
/// `line_total == unit_price * quantity`. Later catalog changes do not
/// touch it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineSnapshot {
    /// Product ID (a reference, not a live link).
    pub product_id: ProductId,
    /// Product name at time of order.
    pub name: String,
    /// Unit price at time of order.
    pub unit_price: Money,
    /// Quantity ordered.
    pub quantity: i64,
    /// Total price for this line.
    pub line_total: Money,
}

impl From<&CartEntry> for OrderLineSnapshot {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product_id.clone(),
            name: entry.name.clone(),
            unit_price: entry.unit_price,
            quantity: entry.quantity,
            line_total: entry.line_total,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Human-readable unique order identifier.
    pub order_id: OrderId,
    /// Customer.
    pub user_id: UserId,
    /// Items in the order, in cart order.
    pub items: Vec<OrderLineSnapshot>,
    /// Shipping details.
    pub shipping_info: ShippingInfo,
    /// Payment details, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<PaymentInfo>,
    /// Pricing breakdown.
    pub order_summary: OrderSummary,
    /// Order status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
}

impl Order {
    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Grand total.
    pub fn total(&self) -> Money {
        self.order_summary.total
    }

    /// Summary row for order listings.
    pub fn summary_view(&self) -> OrderSummaryView {
        OrderSummaryView {
            order_id: self.order_id.clone(),
            order_date: self.order_date,
            status: self.status,
            item_count: self.item_count(),
            total: self.total(),
        }
    }
}

/// One row in a user's order history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSummaryView {
    pub order_id: OrderId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub item_count: i64,
    pub total: Money,
}
