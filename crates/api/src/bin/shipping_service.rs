//! Shipping service entry point.

use std::net::SocketAddr;

use api::config::{SHIPPING_DEFAULT_PORT, ServerConfig};
use api::grpc::ShippingGrpcService;
use api::telemetry;
use proto::ShippingServer;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env(SHIPPING_DEFAULT_PORT);

    telemetry::init_tracing(&config.log_level);
    telemetry::install_metrics(config.metrics_port)?;

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<ShippingServer<ShippingGrpcService>>()
        .await;

    let addr: SocketAddr = config.addr().parse()?;
    tracing::info!(%addr, "starting shipping service");

    Server::builder()
        .add_service(health_service)
        .add_service(ShippingServer::new(ShippingGrpcService::new()))
        .serve_with_shutdown(addr, telemetry::shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}
