//! `payment.Payment` stub: accepts every charge.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use proto::payment::{CreatePaymentRequest, CreatePaymentResponse};
use tonic::{Request, Response, Status};

/// Payment service stand-in that approves every charge with sequential ids.
///
/// An optional delay before each answer lets callers exercise deadlines.
#[derive(Debug, Clone, Default)]
pub struct PaymentStub {
    next_id: Arc<AtomicI64>,
    delay: Option<Duration>,
}

impl PaymentStub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Option<Duration>) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

#[tonic::async_trait]
impl proto::Payment for PaymentStub {
    #[tracing::instrument(skip_all, fields(order_id = request.get_ref().order_id))]
    async fn create(
        &self,
        request: Request<CreatePaymentRequest>,
    ) -> Result<Response<CreatePaymentResponse>, Status> {
        let request = request.into_inner();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            customer_id = request.customer_id,
            total_price = request.total_price,
            payment_id = id,
            "payment accepted"
        );

        Ok(Response::new(CreatePaymentResponse {
            payment_id: id,
            bill_id: id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto::Payment as _;

    fn request(order_id: i64) -> Request<CreatePaymentRequest> {
        Request::new(CreatePaymentRequest {
            customer_id: 123,
            order_id,
            total_price: 25.0,
        })
    }

    #[tokio::test]
    async fn test_sequential_ids() {
        let stub = PaymentStub::new();

        let first = stub.create(request(1)).await.unwrap().into_inner();
        let second = stub.create(request(2)).await.unwrap().into_inner();

        assert_eq!(first.payment_id, 1);
        assert_eq!(first.bill_id, 1);
        assert_eq!(second.payment_id, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay() {
        let stub = PaymentStub::with_delay(Some(Duration::from_secs(3)));
        let start = tokio::time::Instant::now();

        stub.create(request(1)).await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
