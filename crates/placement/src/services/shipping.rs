//! Shipping service trait and in-memory implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::OrderId;
use domain::{Shipping, ShippingItem};
use tokio::sync::RwLock;

use crate::error::RemoteError;

/// Trait for delivery estimation.
#[async_trait]
pub trait ShippingService: Send + Sync {
    /// Requests a delivery estimate, in days, for an order's items.
    async fn estimate_delivery(
        &self,
        order_id: OrderId,
        items: Vec<ShippingItem>,
    ) -> Result<u32, RemoteError>;
}

#[async_trait]
impl<T: ShippingService + ?Sized> ShippingService for Arc<T> {
    async fn estimate_delivery(
        &self,
        order_id: OrderId,
        items: Vec<ShippingItem>,
    ) -> Result<u32, RemoteError> {
        (**self).estimate_delivery(order_id, items).await
    }
}

#[derive(Debug, Default)]
struct InMemoryShippingState {
    requests: Vec<(OrderId, Vec<ShippingItem>)>,
    calls: usize,
    fixed_days: Option<u32>,
    failure: Option<RemoteError>,
    delay: Option<Duration>,
}

/// In-memory shipping service for testing.
///
/// Computes the estimate with the same formula as the shipping service
/// unless a fixed answer is configured.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShippingService {
    state: Arc<RwLock<InMemoryShippingState>>,
}

impl InMemoryShippingService {
    /// Creates a new in-memory shipping service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every request with the given number of days.
    pub async fn set_fixed_days(&self, days: Option<u32>) {
        self.state.write().await.fixed_days = days;
    }

    /// Makes every request fail with the given error, or succeed again with `None`.
    pub async fn set_failure(&self, failure: Option<RemoteError>) {
        self.state.write().await.failure = failure;
    }

    /// Delays every request before answering.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        self.state.write().await.delay = delay;
    }

    /// Returns how many estimates were requested.
    pub async fn call_count(&self) -> usize {
        self.state.read().await.calls
    }

    /// Returns the successful requests.
    pub async fn requests(&self) -> Vec<(OrderId, Vec<ShippingItem>)> {
        self.state.read().await.requests.clone()
    }
}

#[async_trait]
impl ShippingService for InMemoryShippingService {
    async fn estimate_delivery(
        &self,
        order_id: OrderId,
        items: Vec<ShippingItem>,
    ) -> Result<u32, RemoteError> {
        let delay = {
            let mut state = self.state.write().await;
            state.calls += 1;
            state.delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().await;
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }

        let mut shipping = Shipping::new(order_id, items.clone());
        let days = state.fixed_days.unwrap_or_else(|| shipping.schedule());
        state.requests.push((order_id, items));

        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_estimate_uses_formula() {
        let service = InMemoryShippingService::new();
        let items = vec![ShippingItem::new("prod1", 30), ShippingItem::new("prod2", 25)];

        let days = service
            .estimate_delivery(OrderId::new(1), items.clone())
            .await
            .unwrap();

        assert_eq!(days, 11);
        assert_eq!(service.requests().await, vec![(OrderId::new(1), items)]);
    }

    #[tokio::test]
    async fn test_fixed_days() {
        let service = InMemoryShippingService::new();
        service.set_fixed_days(Some(4)).await;

        let days = service
            .estimate_delivery(OrderId::new(1), vec![ShippingItem::new("prod1", 1)])
            .await
            .unwrap();

        assert_eq!(days, 4);
    }

    #[tokio::test]
    async fn test_configured_failure() {
        let service = InMemoryShippingService::new();
        service
            .set_failure(Some(RemoteError::Unavailable("down".to_string())))
            .await;

        let result = service.estimate_delivery(OrderId::new(1), vec![]).await;

        assert!(matches!(result, Err(RemoteError::Unavailable(_))));
        assert_eq!(service.call_count().await, 1);
        assert!(service.requests().await.is_empty());
    }
}
