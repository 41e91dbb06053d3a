//! gRPC service implementations.

pub mod order;
pub mod payment;
pub mod shipping;

pub use order::{DynOrderGrpcService, DynOrderPlacement, OrderGrpcService};
pub use payment::PaymentStub;
pub use shipping::ShippingGrpcService;
