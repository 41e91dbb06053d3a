//! gRPC servers for the order, payment and shipping services.
//!
//! The order service runs the placement workflow against storage and the
//! two downstream services; shipping estimates delivery days; payment is a
//! stub that approves every charge. Each binary adds the standard gRPC
//! health service, structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod grpc;
pub mod telemetry;

use std::sync::Arc;

use placement::{OrderPlacement, PaymentService, PlacementConfig, ShippingService};
use rpc::{CallPolicy, GrpcPaymentClient, GrpcShippingClient};
use storage::{InMemoryStore, OrderRepository, PostgresStore, ProductCatalog};

use config::OrderServiceConfig;
use error::StartupError;
use grpc::DynOrderPlacement;

/// Builds the placement workflow described by `config`.
///
/// Uses PostgreSQL when a database URL is configured (running migrations
/// first) and seeded in-memory storage otherwise. Downstream channels
/// connect lazily, so the order service can start before its dependencies.
pub async fn create_order_placement(
    config: &OrderServiceConfig,
) -> Result<DynOrderPlacement, StartupError> {
    let (catalog, repository): (Arc<dyn ProductCatalog>, Arc<dyn OrderRepository>) =
        match &config.database_url {
            Some(url) => {
                let store = Arc::new(PostgresStore::connect(url).await?);
                store.run_migrations().await?;
                tracing::info!("using PostgreSQL storage");
                (
                    store.clone() as Arc<dyn ProductCatalog>,
                    store as Arc<dyn OrderRepository>,
                )
            }
            None => {
                let store = Arc::new(InMemoryStore::with_products(
                    config.seed_products.iter().map(String::as_str),
                ));
                tracing::info!(products = ?config.seed_products, "using in-memory storage");
                (
                    store.clone() as Arc<dyn ProductCatalog>,
                    store as Arc<dyn OrderRepository>,
                )
            }
        };

    let payment: Arc<dyn PaymentService> = Arc::new(GrpcPaymentClient::connect_lazy(
        config.payment_url.clone(),
        CallPolicy::with_deadline(config.payment_deadline),
    )?);
    let shipping: Arc<dyn ShippingService> = Arc::new(GrpcShippingClient::connect_lazy(
        config.shipping_url.clone(),
        CallPolicy::with_deadline(config.shipping_deadline),
    )?);

    let placement_config = PlacementConfig {
        payment_deadline: config.payment_deadline,
        shipping_deadline: config.shipping_deadline,
        ..PlacementConfig::default()
    };

    Ok(OrderPlacement::new(catalog, repository, payment, shipping).with_config(placement_config))
}
