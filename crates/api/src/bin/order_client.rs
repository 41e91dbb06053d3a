//! Sends a few sample orders to the order service and logs each outcome.

use std::time::Duration;

use api::config::ClientConfig;
use api::telemetry;
use proto::OrderClient;
use proto::order::{CreateOrderRequest, OrderItem};
use tonic::transport::{Channel, Endpoint};

struct Scenario {
    name: &'static str,
    customer_id: i64,
    items: &'static [(&'static str, f32, i32)],
    total_price: f32,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "valid order (total 25.00, quantity 3)",
        customer_id: 123,
        items: &[("prod1", 10.0, 2), ("prod2", 5.0, 1)],
        total_price: 25.0,
    },
    Scenario {
        name: "large quantity (quantity 55)",
        customer_id: 124,
        items: &[("prod1", 1.0, 30), ("prod2", 1.0, 25)],
        total_price: 55.0,
    },
    Scenario {
        name: "expensive order (total 1100.00)",
        customer_id: 125,
        items: &[("prod1", 500.0, 1), ("prod2", 600.0, 1)],
        total_price: 1100.0,
    },
    Scenario {
        name: "valid order after errors (total 55.00, quantity 3)",
        customer_id: 126,
        items: &[("prod3", 15.0, 1), ("prod4", 20.0, 2)],
        total_price: 55.0,
    },
];

async fn run_scenario(client: &mut OrderClient<Channel>, scenario: &Scenario) {
    let mut request = tonic::Request::new(CreateOrderRequest {
        customer_id: scenario.customer_id,
        order_items: scenario
            .items
            .iter()
            .map(|(code, price, quantity)| OrderItem {
                product_code: code.to_string(),
                unit_price: *price,
                quantity: *quantity,
            })
            .collect(),
        total_price: scenario.total_price,
    });
    request.set_timeout(Duration::from_secs(5));

    match client.create(request).await {
        Ok(response) => {
            let response = response.into_inner();
            tracing::info!(
                scenario = scenario.name,
                order_id = response.order_id,
                delivery_days = response.delivery_days,
                "order placed"
            );
        }
        Err(status) => {
            tracing::warn!(
                scenario = scenario.name,
                code = ?status.code(),
                message = status.message(),
                "order rejected"
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing("info");
    let config = ClientConfig::from_env();

    let channel = Endpoint::from_shared(config.order_url.clone())?
        .connect()
        .await?;
    let mut client = OrderClient::new(channel);
    tracing::info!(url = %config.order_url, "connected to order service");

    for scenario in SCENARIOS {
        run_scenario(&mut client, scenario).await;
    }

    Ok(())
}
