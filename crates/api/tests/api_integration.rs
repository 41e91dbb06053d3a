//! End-to-end tests: order, payment and shipping servers over real sockets.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api::config::OrderServiceConfig;
use api::grpc::{OrderGrpcService, PaymentStub, ShippingGrpcService};
use proto::order::{CreateOrderRequest, OrderItem};
use proto::shipping::{CreateShippingRequest, ShippingItem};
use proto::{OrderClient, OrderServer, PaymentServer, ShippingClient, ShippingServer};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::Code;
use tonic::transport::{Channel, Server};
use tonic_health::pb::HealthCheckRequest;
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;

async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

async fn spawn_payment(delay: Option<Duration>) -> SocketAddr {
    let (listener, addr) = bind().await;
    tokio::spawn(
        Server::builder()
            .add_service(PaymentServer::new(PaymentStub::with_delay(delay)))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );
    addr
}

async fn spawn_shipping() -> SocketAddr {
    let (listener, addr) = bind().await;
    tokio::spawn(
        Server::builder()
            .add_service(ShippingServer::new(ShippingGrpcService::new()))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );
    addr
}

/// Starts all three services and returns a client for the order service.
async fn setup(payment_delay: Option<Duration>, extra: &[(&str, &str)]) -> OrderClient<Channel> {
    let payment = spawn_payment(payment_delay).await;
    let shipping = spawn_shipping().await;

    let mut env: HashMap<String, String> = HashMap::from([
        ("PAYMENT_SERVICE_URL".to_string(), format!("http://{payment}")),
        ("SHIPPING_SERVICE_URL".to_string(), format!("http://{shipping}")),
    ]);
    env.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    let config = OrderServiceConfig::from_lookup(|key| env.get(key).cloned());

    let placement = Arc::new(api::create_order_placement(&config).await.unwrap());

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<OrderServer<api::grpc::DynOrderGrpcService>>()
        .await;

    let (listener, addr) = bind().await;
    tokio::spawn(
        Server::builder()
            .add_service(health_service)
            .add_service(OrderServer::new(OrderGrpcService::new(placement)))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );

    OrderClient::connect(format!("http://{addr}")).await.unwrap()
}

fn request(customer_id: i64, items: &[(&str, f32, i32)], total_price: f32) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_id,
        order_items: items
            .iter()
            .map(|(code, price, quantity)| OrderItem {
                product_code: code.to_string(),
                unit_price: *price,
                quantity: *quantity,
            })
            .collect(),
        total_price,
    }
}

#[tokio::test]
async fn test_place_valid_order() {
    let mut client = setup(None, &[]).await;

    let response = client
        .create(request(123, &[("prod1", 10.0, 2), ("prod2", 5.0, 1)], 25.0))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.order_id, 1);
    assert_eq!(response.delivery_days, 1);
}

#[tokio::test]
async fn test_large_quantity_is_not_limited() {
    let mut client = setup(None, &[]).await;

    let response = client
        .create(request(124, &[("prod1", 1.0, 30), ("prod2", 1.0, 25)], 55.0))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.delivery_days, 11);
}

#[tokio::test]
async fn test_order_ids_increase() {
    let mut client = setup(None, &[]).await;

    let first = client
        .create(request(1, &[("prod3", 15.0, 1)], 15.0))
        .await
        .unwrap()
        .into_inner();
    let second = client
        .create(request(1, &[("prod4", 20.0, 2)], 40.0))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(second.order_id, first.order_id + 1);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let mut client = setup(None, &[]).await;

    let status = client
        .create(request(1, &[("prod1", 10.0, 1), ("nope", 1.0, 1)], 11.0))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
    assert!(status.message().contains("nope"));
}

#[tokio::test]
async fn test_seed_products_are_configurable() {
    let mut client = setup(None, &[("SEED_PRODUCTS", "widget")]).await;

    let status = client
        .create(request(1, &[("prod1", 10.0, 1)], 10.0))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let response = client
        .create(request(1, &[("widget", 10.0, 1)], 10.0))
        .await
        .unwrap();
    assert_eq!(response.into_inner().delivery_days, 1);
}

#[tokio::test]
async fn test_slow_payment_is_deadline_exceeded() {
    let mut client = setup(
        Some(Duration::from_secs(2)),
        &[("PAYMENT_DEADLINE_MS", "300")],
    )
    .await;

    let status = client
        .create(request(1, &[("prod1", 10.0, 1)], 10.0))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::DeadlineExceeded);
    assert!(status.message().starts_with("Payment failed"));
}

#[tokio::test]
async fn test_unreachable_shipping_is_reported() {
    let payment = spawn_payment(None).await;
    let (listener, dead) = bind().await;
    drop(listener);

    let env: HashMap<&str, String> = HashMap::from([
        ("PAYMENT_SERVICE_URL", format!("http://{payment}")),
        ("SHIPPING_SERVICE_URL", format!("http://{dead}")),
        ("SHIPPING_DEADLINE_MS", "500".to_string()),
    ]);
    let config = OrderServiceConfig::from_lookup(|key| env.get(key).cloned());
    let placement = Arc::new(api::create_order_placement(&config).await.unwrap());

    let (listener, addr) = bind().await;
    tokio::spawn(
        Server::builder()
            .add_service(OrderServer::new(OrderGrpcService::new(placement)))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );
    let mut client = OrderClient::connect(format!("http://{addr}")).await.unwrap();

    let status = client
        .create(request(1, &[("prod1", 10.0, 1)], 10.0))
        .await
        .unwrap_err();

    // Retries run into the shipping deadline or give up as unavailable.
    assert!(matches!(
        status.code(),
        Code::DeadlineExceeded | Code::Unavailable
    ));
    assert!(status.message().starts_with("Shipping failed"));
}

#[tokio::test]
async fn test_invalid_request_is_invalid_argument() {
    let mut client = setup(None, &[]).await;

    let status = client
        .create(request(1, &[("prod1", 10.0, -2)], 10.0))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = client.create(request(1, &[], 0.0)).await.unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn test_shipping_service_directly() {
    let addr = spawn_shipping().await;
    let mut client = ShippingClient::connect(format!("http://{addr}")).await.unwrap();

    let response = client
        .create(CreateShippingRequest {
            order_id: 9,
            items: vec![
                ShippingItem {
                    product_code: "prod1".to_string(),
                    quantity: 4,
                },
                ShippingItem {
                    product_code: "prod2".to_string(),
                    quantity: 3,
                },
            ],
        })
        .await
        .unwrap();
    assert_eq!(response.into_inner().delivery_days, 2);

    let status = client
        .create(CreateShippingRequest {
            order_id: 9,
            items: vec![ShippingItem {
                product_code: "prod1".to_string(),
                quantity: -1,
            }],
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn test_health_check() {
    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<ShippingServer<ShippingGrpcService>>()
        .await;
    let (listener, addr) = bind().await;
    tokio::spawn(
        Server::builder()
            .add_service(health_service)
            .add_service(ShippingServer::new(ShippingGrpcService::new()))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );

    let channel = Channel::from_shared(format!("http://{addr}"))
        .unwrap()
        .connect()
        .await
        .unwrap();
    let mut client = HealthClient::new(channel);
    let response = client
        .check(HealthCheckRequest {
            service: "shipping.Shipping".to_string(),
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.status, ServingStatus::Serving as i32);
}
