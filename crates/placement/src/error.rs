//! Placement error types.

use std::time::Duration;

use domain::{OrderError, ProductCode};
use storage::StorageError;
use thiserror::Error;

use crate::state::PlacementState;

/// Failure of a call to a remote collaborator (payment or shipping).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The call did not complete before its deadline.
    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    /// The remote service stayed unavailable or overloaded.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The remote service refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Any other failure.
    #[error("call failed: {0}")]
    Failed(String),
}

impl RemoteError {
    /// Returns true if the call ran out of time.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, RemoteError::DeadlineExceeded(_))
    }
}

/// Errors that abort order placement.
///
/// Each variant names the stage that failed and carries that stage's error
/// unchanged. The inner error is part of the message, not a separate source.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// A referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductCode),

    /// The product lookup itself failed.
    #[error("Product validation failed: {0}")]
    ValidationInfrastructure(StorageError),

    /// The order could not be saved.
    #[error("Order could not be saved: {0}")]
    Persistence(StorageError),

    /// The payment charge failed or timed out.
    #[error("Payment failed: {0}")]
    Payment(RemoteError),

    /// The delivery estimate failed or timed out.
    #[error("Shipping failed: {0}")]
    Shipping(RemoteError),

    /// The order handed to the workflow was already placed.
    #[error("Invalid order: {0}")]
    InvalidOrder(OrderError),
}

impl From<OrderError> for PlacementError {
    fn from(err: OrderError) -> Self {
        PlacementError::InvalidOrder(err)
    }
}

impl PlacementError {
    /// Returns the last state the workflow reached before failing.
    pub fn failed_at(&self) -> PlacementState {
        match self {
            PlacementError::ProductNotFound(_)
            | PlacementError::ValidationInfrastructure(_)
            | PlacementError::InvalidOrder(_) => PlacementState::Pending,
            PlacementError::Persistence(_) => PlacementState::ProductsValidated,
            PlacementError::Payment(_) => PlacementState::Persisted,
            PlacementError::Shipping(_) => PlacementState::PaymentCharged,
        }
    }

    /// Returns the stage label used in logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            PlacementError::ProductNotFound(_) | PlacementError::ValidationInfrastructure(_) => {
                "product_validation"
            }
            PlacementError::Persistence(_) => "persistence",
            PlacementError::Payment(_) => "payment",
            PlacementError::Shipping(_) => "shipping",
            PlacementError::InvalidOrder(_) => "invalid_order",
        }
    }

    /// Returns true if a payment or shipping call ran out of time.
    pub fn is_deadline_exceeded(&self) -> bool {
        match self {
            PlacementError::Payment(e) | PlacementError::Shipping(e) => e.is_deadline_exceeded(),
            _ => false,
        }
    }
}
