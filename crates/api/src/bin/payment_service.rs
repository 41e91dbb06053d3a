//! Payment stub entry point.

use std::net::SocketAddr;

use api::config::PaymentServiceConfig;
use api::grpc::PaymentStub;
use api::telemetry;
use proto::PaymentServer;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PaymentServiceConfig::from_env();

    telemetry::init_tracing(&config.server.log_level);
    telemetry::install_metrics(config.server.metrics_port)?;

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter.set_serving::<PaymentServer<PaymentStub>>().await;

    let addr: SocketAddr = config.server.addr().parse()?;
    tracing::info!(%addr, delay = ?config.delay, "starting payment service");

    Server::builder()
        .add_service(health_service)
        .add_service(PaymentServer::new(PaymentStub::with_delay(config.delay)))
        .serve_with_shutdown(addr, telemetry::shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}
