//! Products held in the product collection.

use serde::{Deserialize, Serialize};

use crate::order::ProductCode;

/// A product that can be ordered, keyed by its unique code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product code.
    pub code: ProductCode,

    /// Human-readable product name.
    pub name: String,

    /// Units in stock.
    pub quantity: i32,
}

impl Product {
    /// Creates a new product.
    pub fn new(code: impl Into<ProductCode>, name: impl Into<String>, quantity: i32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            quantity,
        }
    }
}
