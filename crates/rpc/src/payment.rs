//! gRPC adapter for the payment service.

use async_trait::async_trait;
use common::{CustomerId, Money, OrderId};
use placement::{PaymentReceipt, PaymentService, RemoteError};
use proto::PaymentClient;
use proto::payment::CreatePaymentRequest;
use tonic::transport::{Channel, Endpoint};

use crate::call::CallPolicy;
use crate::error::ConnectError;

/// Charges payments through `payment.Payment/Create`.
#[derive(Debug, Clone)]
pub struct GrpcPaymentClient {
    client: PaymentClient<Channel>,
    policy: CallPolicy,
}

impl GrpcPaymentClient {
    /// Creates a client whose channel connects on first use.
    pub fn connect_lazy(url: impl Into<String>, policy: CallPolicy) -> Result<Self, ConnectError> {
        let url = url.into();
        let endpoint = Endpoint::from_shared(url.clone())
            .map_err(|source| ConnectError::InvalidEndpoint { url, source })?;
        Ok(Self::new(endpoint.connect_lazy(), policy))
    }

    pub fn new(channel: Channel, policy: CallPolicy) -> Self {
        Self {
            client: PaymentClient::new(channel),
            policy,
        }
    }
}

#[async_trait]
impl PaymentService for GrpcPaymentClient {
    #[tracing::instrument(skip(self), fields(order_id = %order_id))]
    async fn charge(
        &self,
        customer_id: CustomerId,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentReceipt, RemoteError> {
        let request = CreatePaymentRequest {
            customer_id: customer_id.as_i64(),
            order_id: order_id.as_i64(),
            total_price: amount.to_decimal() as f32,
        };

        let response = self
            .policy
            .execute("payment", |attempt| {
                let mut client = self.client.clone();
                let request = request.clone();
                async move {
                    tracing::debug!(attempt, "calling payment service");
                    client.create(request).await.map(tonic::Response::into_inner)
                }
            })
            .await?;

        Ok(PaymentReceipt {
            payment_id: response.payment_id,
            bill_id: response.bill_id,
        })
    }
}
