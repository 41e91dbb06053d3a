//! Order placement workflow.
//!
//! Placing an order runs these steps in order:
//! 1. Validate that every product exists
//! 2. Persist the order
//! 3. Charge payment
//! 4. Request a delivery estimate
//!
//! The first failing step aborts the workflow. Earlier steps are not undone:
//! a failed payment leaves the order persisted, a failed estimate leaves the
//! payment charged.

pub mod coordinator;
pub mod error;
pub mod services;
pub mod state;

pub use coordinator::{OrderPlacement, PlacementConfig};
pub use error::{PlacementError, RemoteError};
pub use services::{
    InMemoryPaymentService, InMemoryShippingService, PaymentReceipt, PaymentService,
    ShippingService,
};
pub use state::PlacementState;
