//! Domain layer for the order and shipping services.
//!
//! This crate provides:
//! - the Order aggregate with its write-once fields
//! - products as stored in the product collection
//! - the shipping projection and the delivery-day estimator

pub mod error;
pub mod order;
pub mod product;
pub mod shipping;

pub use common::{CustomerId, Money, OrderId};
pub use error::OrderError;
pub use order::{Order, OrderItem, ProductCode};
pub use product::Product;
pub use shipping::{Shipping, ShippingItem, estimate_delivery_days};
