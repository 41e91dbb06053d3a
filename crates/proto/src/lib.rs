//! Protobuf definitions for the order, payment and shipping services.
//!
//! Each package is generated by `tonic-prost-build` into its own module,
//! with both the message types and the client/server stubs.

pub mod order {
    tonic::include_proto!("order");
}

pub mod payment {
    tonic::include_proto!("payment");
}

pub mod shipping {
    tonic::include_proto!("shipping");
}

pub use order::order_client::OrderClient;
pub use order::order_server::{Order, OrderServer};
pub use payment::payment_client::PaymentClient;
pub use payment::payment_server::{Payment, PaymentServer};
pub use shipping::shipping_client::ShippingClient;
pub use shipping::shipping_server::{Shipping, ShippingServer};
