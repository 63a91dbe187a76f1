//! Order persistence.

use crate::checkout::{Order, OrderStatus, OrderSummaryView};
use crate::error::CommerceError;
use crate::ids::{OrderId, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Append-only storage for placed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order. Fails with [`CommerceError::DuplicateOrderId`]
    /// if the id is taken.
    async fn create(&self, order: Order) -> Result<(), CommerceError>;

    /// Summaries of a user's orders, most recent first.
    async fn list_by_user(&self, user_id: &UserId)
        -> Result<Vec<OrderSummaryView>, CommerceError>;

    /// One of the user's orders. Another user's order is reported as not
    /// found.
    async fn get_by_id_for_user(
        &self,
        order_id: &OrderId,
        user_id: &UserId,
    ) -> Result<Order, CommerceError>;

    /// Move an order to a new status, following the status machine.
    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, CommerceError>;
}

#[derive(Debug, Default)]
struct Orders {
    /// Orders per user, in insertion order.
    by_user: HashMap<UserId, Vec<Order>>,
    /// Owner of every stored id; doubles as the uniqueness index.
    owners: HashMap<OrderId, UserId>,
}

/// Orders held in memory.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Orders>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders across all users.
    pub async fn len(&self) -> usize {
        self.orders.read().await.owners.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: Order) -> Result<(), CommerceError> {
        let mut orders = self.orders.write().await;
        if orders.owners.contains_key(&order.order_id) {
            return Err(CommerceError::DuplicateOrderId(order.order_id.to_string()));
        }
        orders
            .owners
            .insert(order.order_id.clone(), order.user_id.clone());
        orders
            .by_user
            .entry(order.user_id.clone())
            .or_default()
            .push(order);
        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<OrderSummaryView>, CommerceError> {
        let orders = self.orders.read().await;
        let mut summaries: Vec<OrderSummaryView> = orders
            .by_user
            .get(user_id)
            .map(|list| list.iter().rev().map(Order::summary_view).collect())
            .unwrap_or_default();

        // Stable, so equal dates keep newest-inserted first.
        summaries.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(summaries)
    }

    async fn get_by_id_for_user(
        &self,
        order_id: &OrderId,
        user_id: &UserId,
    ) -> Result<Order, CommerceError> {
        let orders = self.orders.read().await;
        orders
            .by_user
            .get(user_id)
            .and_then(|list| list.iter().find(|o| &o.order_id == order_id))
            .cloned()
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))
    }

    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        let mut orders = self.orders.write().await;
        let owner = orders
            .owners
            .get(order_id)
            .cloned()
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;
        let order = orders
            .by_user
            .get_mut(&owner)
            .and_then(|list| list.iter_mut().find(|o| &o.order_id == order_id))
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;

        if !order.status.can_transition_to(status) {
            return Err(CommerceError::InvalidStatusTransition {
                from: order.status.to_string(),
                to: status.to_string(),
            });
        }
        order.status = status;
        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::OrderSummary;
    use crate::checkout::{OrderLineSnapshot, ShippingInfo};
    use crate::ids::ProductId;
    use crate::money::Money;
    use chrono::{Duration, TimeZone, Utc};

    fn order(id: &str, user: &str, minutes: i64) -> Order {
        let base = Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap();
        Order {
            order_id: OrderId::new(id),
            user_id: UserId::new(user),
            items: vec![OrderLineSnapshot {
                product_id: ProductId::new("book"),
                name: "Rust Book".to_string(),
                unit_price: Money::new(1999),
                quantity: 2,
                line_total: Money::new(3998),
            }],
            shipping_info: ShippingInfo::new("Austin", "555-0101"),
            payment_info: None,
            order_summary: OrderSummary {
                subtotal: Money::new(3998),
                shipping: Money::new(599),
                tax: Money::new(320),
                total: Money::new(4917),
            },
            status: OrderStatus::Pending,
            order_date: base + Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts() {
        let store = InMemoryOrderStore::new();
        store.create(order("ORD-20240401-11111", "alice", 0)).await.unwrap();

        let err = store
            .create(order("ORD-20240401-11111", "bob", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::DuplicateOrderId(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let store = InMemoryOrderStore::new();
        store.create(order("ORD-20240401-10001", "alice", 5)).await.unwrap();
        store.create(order("ORD-20240401-10002", "alice", 30)).await.unwrap();
        store.create(order("ORD-20240401-10003", "alice", 10)).await.unwrap();
        store.create(order("ORD-20240401-10004", "bob", 60)).await.unwrap();

        let ids: Vec<String> = store
            .list_by_user(&UserId::new("alice"))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.order_id.into_inner())
            .collect();
        assert_eq!(
            ids,
            vec![
                "ORD-20240401-10002",
                "ORD-20240401-10003",
                "ORD-20240401-10001"
            ]
        );
    }

    #[tokio::test]
    async fn test_summary_fields() {
        let store = InMemoryOrderStore::new();
        store.create(order("ORD-20240401-10001", "alice", 0)).await.unwrap();

        let list = store.list_by_user(&UserId::new("alice")).await.unwrap();
        assert_eq!(list[0].item_count, 2);
        assert_eq!(list[0].total, Money::new(4917));
        assert_eq!(list[0].status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_other_users_order_is_not_found() {
        let store = InMemoryOrderStore::new();
        let id = OrderId::new("ORD-20240401-10001");
        store.create(order(id.as_str(), "alice", 0)).await.unwrap();

        assert!(store
            .get_by_id_for_user(&id, &UserId::new("alice"))
            .await
            .is_ok());
        assert!(matches!(
            store.get_by_id_for_user(&id, &UserId::new("mallory")).await,
            Err(CommerceError::OrderNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_status() {
        let store = InMemoryOrderStore::new();
        let id = OrderId::new("ORD-20240401-10001");
        store.create(order(id.as_str(), "alice", 0)).await.unwrap();

        let updated = store
            .update_status(&id, OrderStatus::Processing)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Processing);

        let err = store
            .update_status(&id, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidStatusTransition { .. }));

        let missing = store
            .update_status(&OrderId::new("ORD-20240401-99999"), OrderStatus::Shipped)
            .await;
        assert!(matches!(missing, Err(CommerceError::OrderNotFound(_))));
    }
}
