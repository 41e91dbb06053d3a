//! gRPC adapter for the shipping service.

use async_trait::async_trait;
use common::OrderId;
use domain::ShippingItem;
use placement::{RemoteError, ShippingService};
use proto::ShippingClient;
use proto::shipping::{CreateShippingRequest, ShippingItem as WireShippingItem};
use tonic::transport::{Channel, Endpoint};

use crate::call::CallPolicy;
use crate::error::ConnectError;

/// Requests delivery estimates through `shipping.Shipping/Create`.
#[derive(Debug, Clone)]
pub struct GrpcShippingClient {
    client: ShippingClient<Channel>,
    policy: CallPolicy,
}

impl GrpcShippingClient {
    /// Creates a client whose channel connects on first use.
    pub fn connect_lazy(url: impl Into<String>, policy: CallPolicy) -> Result<Self, ConnectError> {
        let url = url.into();
        let endpoint = Endpoint::from_shared(url.clone())
            .map_err(|source| ConnectError::InvalidEndpoint { url, source })?;
        Ok(Self::new(endpoint.connect_lazy(), policy))
    }

    pub fn new(channel: Channel, policy: CallPolicy) -> Self {
        Self {
            client: ShippingClient::new(channel),
            policy,
        }
    }
}

fn to_wire(items: Vec<ShippingItem>) -> Result<Vec<WireShippingItem>, RemoteError> {
    items
        .into_iter()
        .map(|item| {
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                RemoteError::Rejected(format!(
                    "quantity {} for {} does not fit the wire format",
                    item.quantity, item.product_code
                ))
            })?;
            Ok(WireShippingItem {
                product_code: item.product_code.to_string(),
                quantity,
            })
        })
        .collect()
}

#[async_trait]
impl ShippingService for GrpcShippingClient {
    #[tracing::instrument(skip(self, items), fields(order_id = %order_id, items = items.len()))]
    async fn estimate_delivery(
        &self,
        order_id: OrderId,
        items: Vec<ShippingItem>,
    ) -> Result<u32, RemoteError> {
        let request = CreateShippingRequest {
            order_id: order_id.as_i64(),
            items: to_wire(items)?,
        };

        let response = self
            .policy
            .execute("shipping", |attempt| {
                let mut client = self.client.clone();
                let request = request.clone();
                async move {
                    tracing::debug!(attempt, "calling shipping service");
                    client.create(request).await.map(tonic::Response::into_inner)
                }
            })
            .await?;

        u32::try_from(response.delivery_days).map_err(|_| {
            RemoteError::Failed(format!(
                "shipping returned negative delivery days: {}",
                response.delivery_days
            ))
        })
    }
}
