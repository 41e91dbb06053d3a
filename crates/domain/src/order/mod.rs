//! Order aggregate and related types.

mod aggregate;
mod value_objects;

pub use aggregate::Order;
pub use value_objects::{OrderItem, ProductCode};
