//! Value objects for the order domain.

use common::Money;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::shipping::ShippingItem;

/// Unique code identifying a product in the product collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    /// Creates a new product code from a string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the product code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the code is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ProductCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A line item in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product being ordered.
    pub product_code: ProductCode,

    /// Price per unit.
    pub unit_price: Money,

    /// Quantity ordered.
    pub quantity: u32,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(product_code: impl Into<ProductCode>, unit_price: Money, quantity: u32) -> Self {
        Self {
            product_code: product_code.into(),
            unit_price,
            quantity,
        }
    }

    /// Returns the price for this line (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Checks the item invariants: non-empty code, non-negative price, positive quantity.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.product_code.is_blank() {
            return Err(OrderError::EmptyProductCode);
        }
        if self.unit_price.is_negative() {
            return Err(OrderError::InvalidPrice {
                product_code: self.product_code.to_string(),
                cents: self.unit_price.cents(),
            });
        }
        if self.quantity == 0 {
            return Err(OrderError::InvalidQuantity {
                product_code: self.product_code.to_string(),
                quantity: 0,
            });
        }
        Ok(())
    }

    /// Projects the item onto what the shipping calculation needs.
    pub fn to_shipping_item(&self) -> ShippingItem {
        ShippingItem::new(self.product_code.clone(), self.quantity)
    }
}
