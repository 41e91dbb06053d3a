use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use domain::{Order, Product, ProductCode};

use crate::Result;

/// Looks up products by their unique code.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Returns whether a product with the given code exists.
    ///
    /// A missing product is `Ok(false)`; only infrastructure failures are errors.
    async fn exists(&self, code: &ProductCode) -> Result<bool>;

    /// Returns the product with the given code, if any.
    async fn find(&self, code: &ProductCode) -> Result<Option<Product>>;
}

/// Persists orders.
///
/// Implementations must provide read-your-writes consistency for a single
/// order; nothing stronger is required.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Saves a new order and returns the identifier assigned to it.
    ///
    /// The order's own id is left untouched; callers record the returned id.
    async fn save(&self, order: &Order) -> Result<OrderId>;

    /// Loads an order by its identifier.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;
}

#[async_trait]
impl<T: ProductCatalog + ?Sized> ProductCatalog for Arc<T> {
    async fn exists(&self, code: &ProductCode) -> Result<bool> {
        (**self).exists(code).await
    }

    async fn find(&self, code: &ProductCode) -> Result<Option<Product>> {
        (**self).find(code).await
    }
}

#[async_trait]
impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    async fn save(&self, order: &Order) -> Result<OrderId> {
        (**self).save(order).await
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        (**self).get(id).await
    }
}
