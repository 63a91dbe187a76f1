//! Cart persistence and the cart operations built on it.

use crate::cart::cart::validate_quantity;
use crate::cart::{CartEntry, CartLine, CartLineChange, CartView, PricingCalculator};
use crate::catalog::Catalog;
use crate::clock::{Clock, SystemClock};
use crate::error::CommerceError;
use crate::ids::{ProductId, UserId};
use crate::lock::UserLocks;
use crate::timeout::bounded;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Storage for cart lines.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// All lines for a user, most recently added first.
    async fn lines(&self, user_id: &UserId) -> Result<Vec<CartLine>, CommerceError>;

    /// The line for `(user_id, product_id)`, if any.
    async fn find(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Option<CartLine>, CommerceError>;

    /// Insert a line, or replace the existing line for the same product.
    async fn save(&self, line: CartLine) -> Result<(), CommerceError>;

    /// Delete a line. Returns whether it existed.
    async fn delete(&self, user_id: &UserId, product_id: &ProductId)
        -> Result<bool, CommerceError>;

    /// Delete every line for a user. Returns how many were removed.
    async fn clear(&self, user_id: &UserId) -> Result<usize, CommerceError>;
}

/// Cart lines held in memory, in insertion order per user.
#[derive(Debug, Default)]
pub struct InMemoryCartRepository {
    carts: RwLock<HashMap<UserId, Vec<CartLine>>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn lines(&self, user_id: &UserId) -> Result<Vec<CartLine>, CommerceError> {
        let carts = self.carts.read().await;
        Ok(carts
            .get(user_id)
            .map(|lines| lines.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn find(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Option<CartLine>, CommerceError> {
        let carts = self.carts.read().await;
        Ok(carts
            .get(user_id)
            .and_then(|lines| lines.iter().find(|l| &l.product_id == product_id))
            .cloned())
    }

    async fn save(&self, line: CartLine) -> Result<(), CommerceError> {
        let mut carts = self.carts.write().await;
        let lines = carts.entry(line.user_id.clone()).or_default();
        match lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => *existing = line,
            None => lines.push(line),
        }
        Ok(())
    }

    async fn delete(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<bool, CommerceError> {
        let mut carts = self.carts.write().await;
        let Some(lines) = carts.get_mut(user_id) else {
            return Ok(false);
        };
        let len_before = lines.len();
        lines.retain(|l| &l.product_id != product_id);
        Ok(lines.len() < len_before)
    }

    async fn clear(&self, user_id: &UserId) -> Result<usize, CommerceError> {
        let mut carts = self.carts.write().await;
        Ok(carts.remove(user_id).map(|lines| lines.len()).unwrap_or(0))
    }
}

/// Cart operations for an already-authenticated user.
///
/// Validation runs before any write, so a failed call leaves the cart as it
/// was. Writes hold the user's lock, which checkout also takes.
#[derive(Clone)]
pub struct CartService {
    repo: Arc<dyn CartRepository>,
    catalog: Arc<dyn Catalog>,
    pricing: PricingCalculator,
    clock: Arc<dyn Clock>,
    locks: Arc<UserLocks>,
    store_timeout: Duration,
}

impl CartService {
    /// Create a cart service.
    pub fn new(repo: Arc<dyn CartRepository>, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            repo,
            catalog,
            pricing: PricingCalculator::default(),
            clock: Arc::new(SystemClock),
            locks: Arc::new(UserLocks::new()),
            store_timeout: Duration::from_secs(5),
        }
    }

    /// Set the pricing calculator used for cart subtotals.
    pub fn with_pricing(mut self, pricing: PricingCalculator) -> Self {
        self.pricing = pricing;
        self
    }

    /// Set the clock used to stamp new lines.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the per-call store timeout.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Per-user locks guarding cart writes.
    pub fn locks(&self) -> Arc<UserLocks> {
        self.locks.clone()
    }

    /// Cart entries joined with current catalog data, most recently added
    /// first. Lines whose product has left the catalog are skipped.
    pub async fn get(&self, user_id: &UserId) -> Result<Vec<CartEntry>, CommerceError> {
        let lines = bounded(self.store_timeout, self.repo.lines(user_id)).await?;

        let mut entries = Vec::with_capacity(lines.len());
        for line in &lines {
            match bounded(self.store_timeout, self.catalog.get_product(&line.product_id)).await? {
                Some(product) if product.price.is_negative() => warn!(
                    user_id = %user_id,
                    product_id = %line.product_id,
                    price_cents = product.price.amount_cents,
                    "cart line references a product with a negative price"
                ),
                Some(product) => entries.push(CartEntry::join(line, &product)?),
                None => warn!(
                    user_id = %user_id,
                    product_id = %line.product_id,
                    "cart line references a product missing from the catalog"
                ),
            }
        }
        Ok(entries)
    }

    /// The cart with its item count and subtotal.
    pub async fn view(&self, user_id: &UserId) -> Result<CartView, CommerceError> {
        let items = self.get(user_id).await?;
        let subtotal = self.pricing.subtotal(items.iter().map(CartEntry::priced))?;
        let item_count = items.iter().map(|e| e.quantity).sum();
        Ok(CartView {
            items,
            item_count,
            subtotal,
        })
    }

    /// Add `quantity` of a product, incrementing an existing line.
    pub async fn add(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartLineChange, CommerceError> {
        validate_quantity(quantity)?;

        let product = bounded(self.store_timeout, self.catalog.get_product(product_id))
            .await?
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))?;
        if product.price.is_negative() {
            return Err(CommerceError::InvalidPrice(product.price.amount_cents));
        }

        let _guard = self.locks.acquire(user_id).await;
        let line = match bounded(self.store_timeout, self.repo.find(user_id, product_id)).await? {
            Some(mut existing) => {
                existing.increment(quantity)?;
                existing
            }
            None => CartLine::new(
                user_id.clone(),
                product_id.clone(),
                quantity,
                self.clock.now(),
            )?,
        };
        let final_quantity = line.quantity;

        bounded(self.store_timeout, self.repo.save(line)).await?;
        debug!(user_id = %user_id, product_id = %product_id, quantity = final_quantity, "added to cart");

        Ok(CartLineChange {
            product_id: product_id.clone(),
            product_name: product.name,
            quantity: final_quantity,
        })
    }

    /// Overwrite the quantity of an existing line.
    pub async fn update(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartLineChange, CommerceError> {
        validate_quantity(quantity)?;

        let _guard = self.locks.acquire(user_id).await;
        let mut line = bounded(self.store_timeout, self.repo.find(user_id, product_id))
            .await?
            .ok_or_else(|| CommerceError::ItemNotInCart(product_id.to_string()))?;
        let product_name = self.product_name(product_id).await?;

        line.quantity = quantity;
        bounded(self.store_timeout, self.repo.save(line)).await?;
        debug!(user_id = %user_id, product_id = %product_id, quantity, "updated cart line");

        Ok(CartLineChange {
            product_id: product_id.clone(),
            product_name,
            quantity,
        })
    }

    /// Remove a line. Returns the removed product's name.
    pub async fn remove(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<String, CommerceError> {
        let _guard = self.locks.acquire(user_id).await;
        if bounded(self.store_timeout, self.repo.find(user_id, product_id))
            .await?
            .is_none()
        {
            return Err(CommerceError::ItemNotInCart(product_id.to_string()));
        }
        let product_name = self.product_name(product_id).await?;

        if !bounded(self.store_timeout, self.repo.delete(user_id, product_id)).await? {
            return Err(CommerceError::ItemNotInCart(product_id.to_string()));
        }
        debug!(user_id = %user_id, product_id = %product_id, "removed from cart");

        Ok(product_name)
    }

    /// Empty the cart. Succeeds on an already-empty cart.
    pub async fn clear(&self, user_id: &UserId) -> Result<(), CommerceError> {
        let _guard = self.locks.acquire(user_id).await;
        self.clear_locked(user_id).await
    }

    /// Empty the cart while the caller already holds the user's lock.
    pub(crate) async fn clear_locked(&self, user_id: &UserId) -> Result<(), CommerceError> {
        let removed = bounded(self.store_timeout, self.repo.clear(user_id)).await?;
        debug!(user_id = %user_id, removed, "cleared cart");
        Ok(())
    }

    /// Current product name, or the id if the product has left the catalog.
    async fn product_name(&self, product_id: &ProductId) -> Result<String, CommerceError> {
        Ok(bounded(self.store_timeout, self.catalog.get_product(product_id))
            .await?
            .map(|p| p.name)
            .unwrap_or_else(|| product_id.to_string()))
    }
}
