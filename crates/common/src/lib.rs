//! Shared types used across the order, payment and shipping services.

pub mod types;

pub use types::{CustomerId, Money, OrderId};
