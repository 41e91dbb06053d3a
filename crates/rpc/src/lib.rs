//! Outbound gRPC adapters for the payment and shipping services.
//!
//! Every call runs under a [`CallPolicy`]: one deadline over the whole call,
//! and a [`RetryPolicy`] that retries transient status codes with backoff.
//! Failures are reported as [`placement::RemoteError`].

pub mod call;
pub mod error;
pub mod payment;
pub mod retry;
pub mod shipping;

pub use call::{CallPolicy, remote_error_from_status};
pub use error::ConnectError;
pub use payment::GrpcPaymentClient;
pub use retry::{Backoff, RetryPolicy};
pub use shipping::GrpcShippingClient;
