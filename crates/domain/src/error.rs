//! Domain error types.

use common::OrderId;
use thiserror::Error;

/// Errors raised when building or mutating an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Order has no items.
    #[error("Order has no items")]
    NoItems,

    /// Product code is empty.
    #[error("Product code must not be empty")]
    EmptyProductCode,

    /// Invalid quantity.
    #[error("Invalid quantity for {product_code}: {quantity} (must be greater than 0)")]
    InvalidQuantity { product_code: String, quantity: i64 },

    /// Invalid unit price.
    #[error("Invalid unit price for {product_code}: {cents} cents (must not be negative)")]
    InvalidPrice { product_code: String, cents: i64 },

    /// Invalid total price.
    #[error("Invalid total price: {cents} cents (must not be negative)")]
    InvalidTotal { cents: i64 },

    /// The order already has an identifier.
    #[error("Order already has id {0}")]
    IdAlreadyAssigned(OrderId),

    /// The delivery estimate was already recorded.
    #[error("Delivery days already set to {0}")]
    DeliveryAlreadyAssigned(u32),
}
