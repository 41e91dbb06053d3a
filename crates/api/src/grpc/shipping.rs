//! `shipping.Shipping` service: estimates delivery days.

use common::OrderId;
use domain::{Shipping, ShippingItem};
use proto::shipping::{CreateShippingRequest, CreateShippingResponse};
use tonic::{Request, Response, Status};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingGrpcService;

impl ShippingGrpcService {
    pub fn new() -> Self {
        Self
    }
}

fn shipping_from_request(request: CreateShippingRequest) -> Result<Shipping, ApiError> {
    let items = request
        .items
        .into_iter()
        .map(|item| {
            let quantity = u32::try_from(item.quantity).map_err(|_| {
                ApiError::InvalidRequest(format!(
                    "invalid quantity {} for product {}",
                    item.quantity, item.product_code
                ))
            })?;
            Ok(ShippingItem::new(item.product_code, quantity))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(Shipping::new(OrderId::new(request.order_id), items))
}

#[tonic::async_trait]
impl proto::Shipping for ShippingGrpcService {
    #[tracing::instrument(skip_all, fields(order_id = request.get_ref().order_id))]
    async fn create(
        &self,
        request: Request<CreateShippingRequest>,
    ) -> Result<Response<CreateShippingResponse>, Status> {
        let mut shipping = shipping_from_request(request.into_inner())?;
        let days = shipping.schedule();

        metrics::counter!("shipping_estimates_total").increment(1);
        tracing::info!(
            total_quantity = shipping.total_quantity(),
            delivery_days = days,
            "delivery estimated"
        );

        Ok(Response::new(CreateShippingResponse {
            delivery_days: i32::try_from(days).unwrap_or(i32::MAX),
        }))
    }
}
