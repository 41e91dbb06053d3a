//! Payment service trait and in-memory implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{CustomerId, Money, OrderId};
use tokio::sync::RwLock;

use crate::error::RemoteError;

/// Result of a successful payment charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// The payment ID assigned by the payment service.
    pub payment_id: i64,
    /// The bill ID assigned by the payment service.
    pub bill_id: i64,
}

/// Trait for payment processing operations.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Charges a customer for an order.
    async fn charge(
        &self,
        customer_id: CustomerId,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentReceipt, RemoteError>;
}

#[async_trait]
impl<T: PaymentService + ?Sized> PaymentService for Arc<T> {
    async fn charge(
        &self,
        customer_id: CustomerId,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentReceipt, RemoteError> {
        (**self).charge(customer_id, order_id, amount).await
    }
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    charges: Vec<(CustomerId, OrderId, Money)>,
    calls: usize,
    next_id: i64,
    failure: Option<RemoteError>,
    delay: Option<Duration>,
}

/// In-memory payment service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentService {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentService {
    /// Creates a new in-memory payment service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every charge fail with the given error, or succeed again with `None`.
    pub async fn set_failure(&self, failure: Option<RemoteError>) {
        self.state.write().await.failure = failure;
    }

    /// Delays every charge before answering.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        self.state.write().await.delay = delay;
    }

    /// Returns how many charges were attempted.
    pub async fn call_count(&self) -> usize {
        self.state.read().await.calls
    }

    /// Returns the successful charges.
    pub async fn charges(&self) -> Vec<(CustomerId, OrderId, Money)> {
        self.state.read().await.charges.clone()
    }
}

#[async_trait]
impl PaymentService for InMemoryPaymentService {
    async fn charge(
        &self,
        customer_id: CustomerId,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentReceipt, RemoteError> {
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

        state.next_id += 1;
        let id = state.next_id;
        state.charges.push((customer_id, order_id, amount));

        Ok(PaymentReceipt {
            payment_id: id,
            bill_id: id,
        })
    }
}
