//! Service facade: one method per client operation.
//!
//! Each method checks the caller identity, runs the operation, and wraps the
//! outcome in an [`ApiResponse`]. Transport code only has to map the
//! response's status code.

use crate::cart::{
    CartLineChange, CartRepository, CartService, CartView, InMemoryCartRepository,
    PricingCalculator,
};
use crate::catalog::Catalog;
use crate::checkout::{
    CheckoutRequest, CheckoutService, InMemoryOrderStore, Order, OrderConfirmation, OrderIdSource,
    OrderStatus, OrderStore, OrderSummaryView,
};
use crate::clock::{Clock, SystemClock};
use crate::config::ShopConfig;
use crate::error::CommerceError;
use crate::identity::authenticated;
use crate::ids::{OrderId, ProductId, UserId};
use crate::response::ApiResponse;
use crate::timeout::bounded;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Body of an add-to-cart call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddToCart {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Payload of a successful remove.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemovedItem {
    pub product_id: ProductId,
    pub product_name: String,
}

/// Cart, order and checkout operations behind a single entry point.
#[derive(Clone)]
pub struct Storefront {
    cart: CartService,
    orders: Arc<dyn OrderStore>,
    checkout: CheckoutService,
    store_timeout: Duration,
}

impl Storefront {
    /// Wire a storefront from its parts.
    pub fn new(cart: CartService, orders: Arc<dyn OrderStore>, checkout: CheckoutService) -> Self {
        Self {
            cart,
            orders,
            checkout,
            store_timeout: Duration::from_secs(5),
        }
    }

    /// Build every service from collaborators and configuration.
    pub fn build(
        catalog: Arc<dyn Catalog>,
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderStore>,
        config: &ShopConfig,
    ) -> Result<StorefrontBuilder, CommerceError> {
        config.validate()?;
        Ok(StorefrontBuilder {
            catalog,
            carts,
            orders,
            config: config.clone(),
            clock: Arc::new(SystemClock),
            ids: None,
        })
    }

    /// A storefront backed by in-memory cart and order stores.
    pub fn in_memory(
        catalog: Arc<dyn Catalog>,
        config: &ShopConfig,
    ) -> Result<Storefront, CommerceError> {
        Self::build(
            catalog,
            Arc::new(InMemoryCartRepository::new()),
            Arc::new(InMemoryOrderStore::new()),
            config,
        )?
        .finish()
    }

    pub async fn get_cart(&self, caller: Option<&UserId>) -> ApiResponse<CartView> {
        let result = match authenticated(caller) {
            Ok(user_id) => self.cart.view(user_id).await,
            Err(e) => Err(e),
        };
        ApiResponse::from_result(result, "Cart retrieved", "Failed to retrieve cart")
    }

    pub async fn add_to_cart(
        &self,
        caller: Option<&UserId>,
        request: AddToCart,
    ) -> ApiResponse<CartLineChange> {
        let result = match authenticated(caller) {
            Ok(user_id) => {
                self.cart
                    .add(user_id, &request.product_id, request.quantity)
                    .await
            }
            Err(e) => Err(e),
        };
        ApiResponse::from_result(result, "Product added to cart", "Failed to add product to cart")
    }

    pub async fn update_cart_item(
        &self,
        caller: Option<&UserId>,
        product_id: &ProductId,
        quantity: i64,
    ) -> ApiResponse<CartLineChange> {
        let result = match authenticated(caller) {
            Ok(user_id) => self.cart.update(user_id, product_id, quantity).await,
            Err(e) => Err(e),
        };
        ApiResponse::from_result(result, "Cart updated", "Failed to update cart")
    }

    pub async fn remove_from_cart(
        &self,
        caller: Option<&UserId>,
        product_id: &ProductId,
    ) -> ApiResponse<RemovedItem> {
        let result = match authenticated(caller) {
            Ok(user_id) => self
                .cart
                .remove(user_id, product_id)
                .await
                .map(|product_name| RemovedItem {
                    product_id: product_id.clone(),
                    product_name,
                }),
            Err(e) => Err(e),
        };
        ApiResponse::from_result(
            result,
            "Product removed from cart",
            "Failed to remove product from cart",
        )
    }

    pub async fn clear_cart(&self, caller: Option<&UserId>) -> ApiResponse<()> {
        let result = match authenticated(caller) {
            Ok(user_id) => self.cart.clear(user_id).await,
            Err(e) => Err(e),
        };
        ApiResponse::from_result(result, "Cart cleared", "Failed to clear cart")
    }

    /// Place an order. A committed order whose cart could not be cleared is
    /// still a success, with a message saying so.
    pub async fn place_order(
        &self,
        caller: Option<&UserId>,
        request: CheckoutRequest,
    ) -> ApiResponse<OrderConfirmation> {
        let result = match authenticated(caller) {
            Ok(user_id) => self.checkout.place_order(user_id, request).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(confirmation) if confirmation.is_degraded() => ApiResponse::ok(
                "Order placed successfully, but the cart could not be cleared",
                confirmation,
            ),
            Ok(confirmation) => ApiResponse::ok("Order placed successfully", confirmation),
            Err(e) => ApiResponse::failure("Failed to place order", &e),
        }
    }

    pub async fn list_orders(&self, caller: Option<&UserId>) -> ApiResponse<Vec<OrderSummaryView>> {
        let result = match authenticated(caller) {
            Ok(user_id) => bounded(self.store_timeout, self.orders.list_by_user(user_id)).await,
            Err(e) => Err(e),
        };
        ApiResponse::from_result(result, "Orders retrieved", "Failed to retrieve orders")
    }

    pub async fn get_order(
        &self,
        caller: Option<&UserId>,
        order_id: &OrderId,
    ) -> ApiResponse<Order> {
        let result = match authenticated(caller) {
            Ok(user_id) => {
                bounded(
                    self.store_timeout,
                    self.orders.get_by_id_for_user(order_id, user_id),
                )
                .await
            }
            Err(e) => Err(e),
        };
        ApiResponse::from_result(result, "Order retrieved", "Failed to retrieve order")
    }

    /// Cancel one of the caller's own orders while it is still pending or
    /// processing.
    pub async fn cancel_order(
        &self,
        caller: Option<&UserId>,
        order_id: &OrderId,
    ) -> ApiResponse<OrderSummaryView> {
        let result = match authenticated(caller) {
            Ok(user_id) => self.cancel(user_id, order_id).await,
            Err(e) => Err(e),
        };
        ApiResponse::from_result(result, "Order cancelled", "Failed to cancel order")
    }

    async fn cancel(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> Result<OrderSummaryView, CommerceError> {
        // Ownership first, so other users' orders stay invisible.
        bounded(
            self.store_timeout,
            self.orders.get_by_id_for_user(order_id, user_id),
        )
        .await?;
        let order = bounded(
            self.store_timeout,
            self.orders.update_status(order_id, OrderStatus::Cancelled),
        )
        .await?;
        info!(user_id = %user_id, order_id = %order_id, "order cancelled");
        Ok(order.summary_view())
    }
}

/// Assembles a [`Storefront`] with optional overrides for time and ids.
pub struct StorefrontBuilder {
    catalog: Arc<dyn Catalog>,
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderStore>,
    config: ShopConfig,
    clock: Arc<dyn Clock>,
    ids: Option<Arc<dyn OrderIdSource>>,
}

impl StorefrontBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn id_source(mut self, ids: Arc<dyn OrderIdSource>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn finish(self) -> Result<Storefront, CommerceError> {
        let pricing = PricingCalculator::from_config(&self.config.pricing)?;
        let store_timeout = self.config.checkout.store_timeout();

        let cart = CartService::new(self.carts, self.catalog)
            .with_pricing(pricing)
            .with_clock(self.clock.clone())
            .with_store_timeout(store_timeout);

        let mut checkout = CheckoutService::new(cart.clone(), self.orders.clone())
            .with_config(&self.config)?
            .with_clock(self.clock);
        if let Some(ids) = self.ids {
            checkout = checkout.with_id_source(ids);
        }

        let mut storefront = Storefront::new(cart, self.orders, checkout);
        storefront.store_timeout = store_timeout;
        Ok(storefront)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, Product};
    use crate::checkout::ShippingInfo;
    use crate::error::ErrorKind;
    use crate::money::Money;

    fn storefront() -> Storefront {
        let catalog = InMemoryCatalog::with_products([
            Product::new("book", "Rust Book", Money::new(1999)),
            Product::new("mug", "Ferris Mug", Money::new(1299)),
        ]);
        Storefront::in_memory(Arc::new(catalog), &ShopConfig::default()).unwrap()
    }

    fn add(product: &str, quantity: i64) -> AddToCart {
        AddToCart {
            product_id: ProductId::new(product),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_requires_caller() {
        let shop = storefront();

        let response = shop.get_cart(None).await;
        assert!(!response.success);
        assert_eq!(response.error_kind(), Some(ErrorKind::Unauthenticated));
        assert_eq!(response.status_code(), 401);

        let response = shop
            .place_order(None, CheckoutRequest::new(ShippingInfo::new("Austin", "555-0101")))
            .await;
        assert_eq!(response.status_code(), 401);
    }

    #[test]
    fn test_add_defaults_to_one() {
        let request: AddToCart = serde_json::from_str(r#"{"product_id":"book"}"#).unwrap();
        assert_eq!(request.quantity, 1);
    }

    #[tokio::test]
    async fn test_cart_round() {
        let shop = storefront();
        let alice = UserId::new("alice");

        let added = shop.add_to_cart(Some(&alice), add("book", 2)).await;
        assert!(added.success);
        assert_eq!(added.data.unwrap().product_name, "Rust Book");

        let view = shop.get_cart(Some(&alice)).await.data.unwrap();
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, Money::new(3998));

        let removed = shop
            .remove_from_cart(Some(&alice), &ProductId::new("book"))
            .await;
        assert_eq!(removed.data.unwrap().product_name, "Rust Book");

        let missing = shop
            .remove_from_cart(Some(&alice), &ProductId::new("book"))
            .await;
        assert_eq!(missing.status_code(), 404);
    }

    #[tokio::test]
    async fn test_empty_cart_checkout_is_rejected() {
        let shop = storefront();
        let alice = UserId::new("alice");

        let response = shop
            .place_order(
                Some(&alice),
                CheckoutRequest::new(ShippingInfo::new("Austin", "555-0101")),
            )
            .await;
        assert_eq!(response.error_kind(), Some(ErrorKind::InvalidState));
        assert_eq!(response.error.unwrap().detail, "Cart is empty");
        assert!(shop.list_orders(Some(&alice)).await.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_list_and_cancel() {
        let shop = storefront();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        shop.add_to_cart(Some(&alice), add("book", 1)).await;
        shop.add_to_cart(Some(&alice), add("mug", 2)).await;

        let placed = shop
            .place_order(
                Some(&alice),
                CheckoutRequest::new(ShippingInfo::new("Austin", "555-0101")),
            )
            .await;
        assert!(placed.success);
        assert_eq!(placed.message, "Order placed successfully");
        let confirmation = placed.data.unwrap();
        assert_eq!(confirmation.item_count, 3);
        assert!(shop.get_cart(Some(&alice)).await.data.unwrap().is_empty());

        let orders = shop.list_orders(Some(&alice)).await.data.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, confirmation.order_id);

        let hidden = shop.get_order(Some(&bob), &confirmation.order_id).await;
        assert_eq!(hidden.status_code(), 404);
        let foreign_cancel = shop.cancel_order(Some(&bob), &confirmation.order_id).await;
        assert_eq!(foreign_cancel.status_code(), 404);

        let cancelled = shop
            .cancel_order(Some(&alice), &confirmation.order_id)
            .await;
        assert_eq!(cancelled.data.unwrap().status, OrderStatus::Cancelled);

        let again = shop
            .cancel_order(Some(&alice), &confirmation.order_id)
            .await;
        assert_eq!(again.error_kind(), Some(ErrorKind::InvalidState));
    }
}
