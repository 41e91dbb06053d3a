//! `order.Order` service: places orders.

use std::sync::Arc;

use common::{CustomerId, Money};
use domain::{Order, OrderItem};
use placement::{OrderPlacement, PaymentService, ShippingService};
use proto::order::{CreateOrderRequest, CreateOrderResponse, OrderItem as WireOrderItem};
use storage::{OrderRepository, ProductCatalog};
use tonic::{Request, Response, Status};

use crate::error::ApiError;

/// Placement wired with runtime-selected collaborators.
pub type DynOrderPlacement = OrderPlacement<
    Arc<dyn ProductCatalog>,
    Arc<dyn OrderRepository>,
    Arc<dyn PaymentService>,
    Arc<dyn ShippingService>,
>;

/// Order service over [`DynOrderPlacement`].
pub type DynOrderGrpcService = OrderGrpcService<
    Arc<dyn ProductCatalog>,
    Arc<dyn OrderRepository>,
    Arc<dyn PaymentService>,
    Arc<dyn ShippingService>,
>;

/// Serves `order.Order/Create` on top of an [`OrderPlacement`].
pub struct OrderGrpcService<C, R, P, S>
where
    C: ProductCatalog,
    R: OrderRepository,
    P: PaymentService,
    S: ShippingService,
{
    placement: Arc<OrderPlacement<C, R, P, S>>,
}

impl<C, R, P, S> OrderGrpcService<C, R, P, S>
where
    C: ProductCatalog,
    R: OrderRepository,
    P: PaymentService,
    S: ShippingService,
{
    pub fn new(placement: Arc<OrderPlacement<C, R, P, S>>) -> Self {
        Self { placement }
    }
}

/// Builds a domain order from the wire request.
pub fn order_from_request(request: CreateOrderRequest) -> Result<Order, ApiError> {
    let items = request
        .order_items
        .into_iter()
        .map(item_from_wire)
        .collect::<Result<Vec<_>, _>>()?;

    let total = Money::from_decimal(f64::from(request.total_price)).ok_or_else(|| {
        ApiError::InvalidRequest(format!("invalid total price {}", request.total_price))
    })?;

    Order::new(CustomerId::new(request.customer_id), items, total)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

fn item_from_wire(item: WireOrderItem) -> Result<OrderItem, ApiError> {
    let quantity = u32::try_from(item.quantity).map_err(|_| {
        ApiError::InvalidRequest(format!(
            "invalid quantity {} for product {}",
            item.quantity, item.product_code
        ))
    })?;
    let unit_price = Money::from_decimal(f64::from(item.unit_price)).ok_or_else(|| {
        ApiError::InvalidRequest(format!(
            "invalid unit price {} for product {}",
            item.unit_price, item.product_code
        ))
    })?;

    Ok(OrderItem::new(item.product_code, unit_price, quantity))
}

#[tonic::async_trait]
impl<C, R, P, S> proto::Order for OrderGrpcService<C, R, P, S>
where
    C: ProductCatalog + 'static,
    R: OrderRepository + 'static,
    P: PaymentService + 'static,
    S: ShippingService + 'static,
{
    async fn create(
        &self,
        request: Request<CreateOrderRequest>,
    ) -> Result<Response<CreateOrderResponse>, Status> {
        let order = order_from_request(request.into_inner())?;

        let placed = self
            .placement
            .place_order(order)
            .await
            .map_err(ApiError::from)?;

        let order_id = placed
            .id()
            .ok_or_else(|| Status::internal("placed order has no id"))?;
        let delivery_days = placed
            .delivery_days()
            .ok_or_else(|| Status::internal("placed order has no delivery estimate"))?;

        Ok(Response::new(CreateOrderResponse {
            order_id: order_id.as_i64(),
            delivery_days: i32::try_from(delivery_days).unwrap_or(i32::MAX),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_item(code: &str, price: f32, quantity: i32) -> WireOrderItem {
        WireOrderItem {
            product_code: code.to_string(),
            unit_price: price,
            quantity,
        }
    }

    #[test]
    fn test_order_from_request() {
        let order = order_from_request(CreateOrderRequest {
            customer_id: 123,
            order_items: vec![wire_item("prod1", 10.0, 2), wire_item("prod2", 5.0, 1)],
            total_price: 25.0,
        })
        .unwrap();

        assert_eq!(order.customer_id(), CustomerId::new(123));
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.items()[0].unit_price, Money::from_cents(1000));
        assert_eq!(order.total_price(), Money::from_cents(2500));
        assert_eq!(order.id(), None);
    }

    #[test]
    fn test_negative_quantity_is_invalid() {
        let result = order_from_request(CreateOrderRequest {
            customer_id: 1,
            order_items: vec![wire_item("prod1", 10.0, -1)],
            total_price: 10.0,
        });
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_empty_order_is_invalid() {
        let result = order_from_request(CreateOrderRequest {
            customer_id: 1,
            order_items: vec![],
            total_price: 0.0,
        });
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_non_finite_price_is_invalid() {
        let result = order_from_request(CreateOrderRequest {
            customer_id: 1,
            order_items: vec![wire_item("prod1", f32::NAN, 1)],
            total_price: 10.0,
        });
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }
}
