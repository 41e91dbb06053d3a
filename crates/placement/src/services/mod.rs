//! Remote collaborator traits and in-memory implementations for placement steps.

pub mod payment;
pub mod shipping;

pub use payment::{InMemoryPaymentService, PaymentReceipt, PaymentService};
pub use shipping::{InMemoryShippingService, ShippingService};
