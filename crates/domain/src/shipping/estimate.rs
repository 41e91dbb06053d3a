use common::OrderId;
use serde::{Deserialize, Serialize};

use crate::order::ProductCode;

/// Units that fit in a single day of delivery.
const UNITS_PER_DAY: u64 = 5;

/// Product code and quantity, the part of an order item shipping cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingItem {
    pub product_code: ProductCode,
    pub quantity: u32,
}

impl ShippingItem {
    /// Creates a new shipping item.
    pub fn new(product_code: impl Into<ProductCode>, quantity: u32) -> Self {
        Self {
            product_code: product_code.into(),
            quantity,
        }
    }
}

/// A shipping request for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipping {
    pub order_id: OrderId,
    pub items: Vec<ShippingItem>,
    delivery_days: Option<u32>,
}

impl Shipping {
    /// Creates a shipping request that has not been scheduled yet.
    pub fn new(order_id: OrderId, items: Vec<ShippingItem>) -> Self {
        Self {
            order_id,
            items,
            delivery_days: None,
        }
    }

    /// Total units across all items.
    pub fn total_quantity(&self) -> u64 {
        total_quantity(&self.items)
    }

    /// Computes the delivery estimate, records it and returns it.
    pub fn schedule(&mut self) -> u32 {
        let days = estimate_delivery_days(&self.items);
        self.delivery_days = Some(days);
        days
    }

    /// Returns the recorded delivery estimate.
    pub fn delivery_days(&self) -> Option<u32> {
        self.delivery_days
    }
}

fn total_quantity(items: &[ShippingItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Estimates delivery days from the total quantity of the given items.
///
/// One day covers up to five units; every further five units add a day,
/// i.e. `1 + (total - 1) / 5` once the total exceeds five.
pub fn estimate_delivery_days(items: &[ShippingItem]) -> u32 {
    let total = total_quantity(items);
    if total <= UNITS_PER_DAY {
        return 1;
    }
    let days = 1 + (total - 1) / UNITS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX)
}
