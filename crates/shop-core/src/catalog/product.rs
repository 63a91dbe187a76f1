//! Product lookup.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A product as seen by the cart: current name and price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current unit price.
    pub price: Money,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Category name.
    #[serde(default)]
    pub category: String,
}

impl Product {
    /// Create a new product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            description: String::new(),
            category: String::new(),
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Read-only product lookup provided by the catalog service.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up a product by id. `Ok(None)` means the product does not exist.
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, CommerceError>;
}

/// Catalog held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with products.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            products: RwLock::new(products),
        }
    }

    /// Insert or replace a product.
    pub async fn upsert(&self, product: Product) {
        self.products.write().await.insert(product.id.clone(), product);
    }

    /// Remove a product.
    pub async fn remove(&self, id: &ProductId) -> bool {
        self.products.write().await.remove(id).is_some()
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, CommerceError> {
        Ok(self.products.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup() {
        let catalog = InMemoryCatalog::with_products([Product::new(
            "prod-1",
            "Rust Mug",
            Money::new(1299),
        )
        .with_category("kitchen")]);

        let found = catalog.get_product(&ProductId::new("prod-1")).await.unwrap();
        assert_eq!(found.map(|p| p.name), Some("Rust Mug".to_string()));

        let missing = catalog.get_product(&ProductId::new("nope")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_price_change_is_visible() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert(Product::new("prod-1", "Mug", Money::new(1000))).await;
        catalog.upsert(Product::new("prod-1", "Mug", Money::new(1200))).await;

        let product = catalog.get_product(&ProductId::new("prod-1")).await.unwrap().unwrap();
        assert_eq!(product.price, Money::new(1200));
    }
}
