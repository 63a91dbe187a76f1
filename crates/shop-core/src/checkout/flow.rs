//! Checkout: turn a user's cart into a placed order.
//!
//! The flow is an ordered two-step commit without a shared transaction:
//!
//! 1. persist the order (the customer-visible commitment), then
//! 2. clear the cart (housekeeping).
//!
//! A failure in step 2 never undoes step 1. The caller gets a degraded
//! success with `cart_cleared == false` and the failure is logged.

use crate::cart::{CartEntry, CartService, PricingCalculator};
use crate::checkout::order_id::{OrderIdSource, RandomOrderIds};
use crate::checkout::{Order, OrderLineSnapshot, OrderStatus, OrderStore, PaymentInfo, ShippingInfo};
use crate::clock::{Clock, SystemClock};
use crate::config::ShopConfig;
use crate::error::CommerceError;
use crate::ids::{OrderId, UserId};
use crate::lock::UserLocks;
use crate::money::Money;
use crate::timeout::bounded;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// What the client submits at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutRequest {
    /// Where to ship.
    pub shipping_info: ShippingInfo,
    /// Payment details, recorded as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<PaymentInfo>,
}

impl CheckoutRequest {
    pub fn new(shipping_info: ShippingInfo) -> Self {
        Self {
            shipping_info,
            payment_info: None,
        }
    }

    pub fn with_payment(mut self, payment_info: PaymentInfo) -> Self {
        self.payment_info = Some(payment_info);
        self
    }
}

/// Returned to the client once the order is committed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub total: Money,
    /// Sum of quantities.
    pub item_count: i64,
    pub order_date: DateTime<Utc>,
    /// False when the order was placed but the cart could not be emptied.
    pub cart_cleared: bool,
}

impl OrderConfirmation {
    /// Order placed but cart cleanup failed.
    pub fn is_degraded(&self) -> bool {
        !self.cart_cleared
    }
}

/// Places orders from carts.
#[derive(Clone)]
pub struct CheckoutService {
    cart: CartService,
    orders: Arc<dyn OrderStore>,
    pricing: PricingCalculator,
    ids: Arc<dyn OrderIdSource>,
    clock: Arc<dyn Clock>,
    locks: Arc<UserLocks>,
    max_id_attempts: u32,
    store_timeout: Duration,
}

impl CheckoutService {
    /// Create a checkout service with default pricing, random ids and the
    /// system clock.
    pub fn new(cart: CartService, orders: Arc<dyn OrderStore>) -> Self {
        let locks = cart.locks();
        Self {
            cart,
            orders,
            pricing: PricingCalculator::default(),
            ids: Arc::new(RandomOrderIds),
            clock: Arc::new(SystemClock),
            locks,
            max_id_attempts: 3,
            store_timeout: Duration::from_secs(5),
        }
    }

    /// Apply pricing and checkout settings from configuration.
    pub fn with_config(mut self, config: &ShopConfig) -> Result<Self, CommerceError> {
        self.pricing = PricingCalculator::from_config(&config.pricing)?;
        self.max_id_attempts = config.checkout.max_id_attempts.max(1);
        self.store_timeout = config.checkout.store_timeout();
        Ok(self)
    }

    pub fn with_pricing(mut self, pricing: PricingCalculator) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_id_source(mut self, ids: Arc<dyn OrderIdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Total persistence attempts before an id collision becomes fatal.
    pub fn with_max_id_attempts(mut self, attempts: u32) -> Self {
        self.max_id_attempts = attempts.max(1);
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Place an order from the user's cart.
    ///
    /// Same-user calls are serialised; a second concurrent checkout sees the
    /// cart the first one cleared. Cart writes for the user wait until the
    /// cart is cleared, so nothing added mid-checkout is lost.
    pub async fn place_order(
        &self,
        user_id: &UserId,
        request: CheckoutRequest,
    ) -> Result<OrderConfirmation, CommerceError> {
        let guard = self.locks.acquire(user_id).await;

        request.shipping_info.validate()?;

        let entries = self.cart.get(user_id).await?;
        if entries.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let order_summary = self.pricing.calculate(entries.iter().map(CartEntry::priced))?;
        let order_date = self.clock.now();
        let order = Order {
            order_id: self.ids.next_id(order_date),
            user_id: user_id.clone(),
            items: entries.iter().map(OrderLineSnapshot::from).collect(),
            shipping_info: request.shipping_info,
            payment_info: request.payment_info,
            order_summary,
            status: OrderStatus::Pending,
            order_date,
        };

        let order = self.persist(order).await?;
        info!(
            user_id = %user_id,
            order_id = %order.order_id,
            total = %order.total(),
            "order placed"
        );

        // The order is committed. Clearing runs in its own task, still
        // holding the user's lock, so it completes even if the caller goes
        // away.
        let cart = self.cart.clone();
        let owner = user_id.clone();
        let cleanup = tokio::spawn(async move {
            let _guard = guard;
            cart.clear_locked(&owner).await
        });
        let cart_cleared = match cleanup.await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!(user_id = %user_id, order_id = %order.order_id, error = %e, "order placed but cart not cleared");
                false
            }
            Err(e) => {
                error!(user_id = %user_id, order_id = %order.order_id, error = %e, "cart cleanup task failed");
                false
            }
        };

        Ok(OrderConfirmation {
            item_count: order.item_count(),
            total: order.total(),
            order_id: order.order_id,
            order_date: order.order_date,
            cart_cleared,
        })
    }

    /// Store the order, regenerating its id on collision up to
    /// `max_id_attempts` attempts in total.
    async fn persist(&self, mut order: Order) -> Result<Order, CommerceError> {
        for attempt in 1..=self.max_id_attempts {
            match bounded(self.store_timeout, self.orders.create(order.clone())).await {
                Ok(()) => return Ok(order),
                Err(CommerceError::DuplicateOrderId(id)) => {
                    warn!(attempt, order_id = %id, "order id collision");
                    if attempt < self.max_id_attempts {
                        order.order_id = self.ids.next_id(order.order_date);
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(CommerceError::OrderIdExhausted(self.max_id_attempts))
    }
}
