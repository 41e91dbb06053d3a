//! Shipping projection and delivery estimation.

mod estimate;

pub use estimate::{Shipping, ShippingItem, estimate_delivery_days};
