//! Order aggregate.

use common::{CustomerId, Money, OrderId};
use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::shipping::ShippingItem;

use super::OrderItem;

/// An order placed by a customer.
///
/// Items and total price are fixed at construction. The identifier is
/// assigned once by persistence, and the delivery estimate is recorded once
/// when placement completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: Option<OrderId>,
    customer_id: CustomerId,
    items: Vec<OrderItem>,
    total_price: Money,
    delivery_days: Option<u32>,
}

impl Order {
    /// Creates a new, not yet persisted order.
    ///
    /// The order must contain at least one valid item and a non-negative total.
    pub fn new(
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        total_price: Money,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }
        for item in &items {
            item.validate()?;
        }
        if total_price.is_negative() {
            return Err(OrderError::InvalidTotal {
                cents: total_price.cents(),
            });
        }

        Ok(Self {
            id: None,
            customer_id,
            items,
            total_price,
            delivery_days: None,
        })
    }

    /// Rebuilds a persisted order from storage.
    pub fn restore(
        id: OrderId,
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        total_price: Money,
        delivery_days: Option<u32>,
    ) -> Self {
        Self {
            id: Some(id),
            customer_id,
            items,
            total_price,
            delivery_days,
        }
    }

    /// Returns the order ID, if the order has been persisted.
    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    /// Returns the customer ID.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the items in order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the total price supplied when the order was created.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the sum of all line totals.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Returns the total number of units across all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Returns the delivery estimate, once placement has completed.
    pub fn delivery_days(&self) -> Option<u32> {
        self.delivery_days
    }

    /// Returns the item projection sent to the shipping service.
    pub fn shipping_items(&self) -> Vec<ShippingItem> {
        self.items.iter().map(OrderItem::to_shipping_item).collect()
    }

    /// Records the identifier assigned by persistence.
    pub fn assign_id(&mut self, id: OrderId) -> Result<(), OrderError> {
        if let Some(existing) = self.id {
            return Err(OrderError::IdAlreadyAssigned(existing));
        }
        self.id = Some(id);
        Ok(())
    }

    /// Records the delivery estimate.
    pub fn assign_delivery_days(&mut self, days: u32) -> Result<(), OrderError> {
        if let Some(existing) = self.delivery_days {
            return Err(OrderError::DeliveryAlreadyAssigned(existing));
        }
        self.delivery_days = Some(days);
        Ok(())
    }
}
