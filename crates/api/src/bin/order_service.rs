//! Order service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use api::config::OrderServiceConfig;
use api::grpc::{DynOrderGrpcService, OrderGrpcService};
use api::telemetry;
use proto::OrderServer;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = OrderServiceConfig::from_env();

    // 1. Initialize tracing
    telemetry::init_tracing(&config.server.log_level);

    // 2. Install Prometheus metrics recorder
    telemetry::install_metrics(config.server.metrics_port)?;

    // 3. Wire storage, downstream clients and the placement workflow
    let placement = Arc::new(api::create_order_placement(&config).await?);
    let service: DynOrderGrpcService = OrderGrpcService::new(placement);

    // 4. Health reporting
    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<OrderServer<DynOrderGrpcService>>()
        .await;

    // 5. Start server
    let addr: SocketAddr = config.server.addr().parse()?;
    tracing::info!(
        %addr,
        payment = %config.payment_url,
        shipping = %config.shipping_url,
        "starting order service"
    );

    Server::builder()
        .add_service(health_service)
        .add_service(OrderServer::new(service))
        .serve_with_shutdown(addr, telemetry::shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}
