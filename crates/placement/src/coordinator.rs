//! Order placement coordinator.

use std::future::Future;
use std::time::{Duration, Instant};

use domain::{Order, OrderError};
use storage::{OrderRepository, ProductCatalog, StorageError};

use crate::error::{PlacementError, RemoteError};
use crate::services::payment::PaymentService;
use crate::services::shipping::ShippingService;
use crate::state::PlacementState;

/// Deadlines applied to each collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementConfig {
    /// Bound on each product lookup and on the order save.
    pub storage_deadline: Duration,
    /// Bound on the payment charge.
    pub payment_deadline: Duration,
    /// Bound on the delivery estimate.
    pub shipping_deadline: Duration,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            storage_deadline: Duration::from_secs(5),
            payment_deadline: Duration::from_secs(2),
            shipping_deadline: Duration::from_secs(2),
        }
    }
}

/// Places orders: validate products, persist, charge, estimate delivery.
///
/// Steps run strictly in sequence and the first failure aborts the rest.
/// Nothing is compensated: an order whose payment fails stays persisted.
pub struct OrderPlacement<C, R, P, S>
where
    C: ProductCatalog,
    R: OrderRepository,
    P: PaymentService,
    S: ShippingService,
{
    catalog: C,
    repository: R,
    payment: P,
    shipping: S,
    config: PlacementConfig,
}

impl<C, R, P, S> OrderPlacement<C, R, P, S>
where
    C: ProductCatalog,
    R: OrderRepository,
    P: PaymentService,
    S: ShippingService,
{
    /// Creates a coordinator with default deadlines.
    pub fn new(catalog: C, repository: R, payment: P, shipping: S) -> Self {
        Self {
            catalog,
            repository,
            payment,
            shipping,
            config: PlacementConfig::default(),
        }
    }

    /// Replaces the deadlines.
    pub fn with_config(mut self, config: PlacementConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Places a new order.
    ///
    /// Returns the order with its assigned id and delivery estimate. The
    /// order must not have been placed before.
    #[tracing::instrument(
        skip(self, order),
        fields(
            customer_id = %order.customer_id(),
            items = order.items().len(),
            state = tracing::field::Empty
        )
    )]
    pub async fn place_order(&self, order: Order) -> Result<Order, PlacementError> {
        metrics::counter!("order_placements_total").increment(1);
        let start = Instant::now();

        let mut state = PlacementState::Pending;
        let result = self.run(order, &mut state).await;

        metrics::histogram!("order_placement_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        match &result {
            Ok(order) => {
                tracing::info!(
                    order_id = ?order.id(),
                    delivery_days = ?order.delivery_days(),
                    "order placed"
                );
            }
            Err(e) => {
                metrics::counter!("order_placements_failed_total", "stage" => e.stage())
                    .increment(1);
                tracing::warn!(
                    stage = e.stage(),
                    reached = %state,
                    error = %e,
                    "order placement failed"
                );
            }
        }

        result
    }

    /// Runs the steps, moving `state` forward after each one succeeds.
    async fn run(
        &self,
        mut order: Order,
        state: &mut PlacementState,
    ) -> Result<Order, PlacementError> {
        if let Some(id) = order.id() {
            return Err(OrderError::IdAlreadyAssigned(id).into());
        }
        if let Some(days) = order.delivery_days() {
            return Err(OrderError::DeliveryAlreadyAssigned(days).into());
        }

        // 1. Every product must exist
        self.validate_products(&order).await?;
        advance(state, PlacementState::ProductsValidated);

        // 2. Persist
        let order_id = self
            .storage_call(self.repository.save(&order))
            .await
            .map_err(PlacementError::Persistence)?;
        order.assign_id(order_id)?;
        advance(state, PlacementState::Persisted);

        // 3. Charge
        let receipt = self
            .remote_call(
                "payment",
                self.config.payment_deadline,
                self.payment
                    .charge(order.customer_id(), order_id, order.total_price()),
            )
            .await
            .map_err(PlacementError::Payment)?;
        tracing::debug!(
            payment_id = receipt.payment_id,
            bill_id = receipt.bill_id,
            "payment charged"
        );
        advance(state, PlacementState::PaymentCharged);

        // 4. Estimate delivery
        let days = self
            .remote_call(
                "shipping",
                self.config.shipping_deadline,
                self.shipping
                    .estimate_delivery(order_id, order.shipping_items()),
            )
            .await
            .map_err(PlacementError::Shipping)?;
        advance(state, PlacementState::DeliveryEstimated);

        order.assign_delivery_days(days)?;
        advance(state, PlacementState::Complete);

        Ok(order)
    }

    async fn validate_products(&self, order: &Order) -> Result<(), PlacementError> {
        for item in order.items() {
            let exists = self
                .storage_call(self.catalog.exists(&item.product_code))
                .await
                .map_err(PlacementError::ValidationInfrastructure)?;

            if !exists {
                return Err(PlacementError::ProductNotFound(item.product_code.clone()));
            }
        }
        Ok(())
    }

    async fn storage_call<T, F>(&self, call: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        let deadline = self.config.storage_deadline;
        match tokio::time::timeout(deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(?deadline, "storage call timed out");
                Err(StorageError::Timeout(deadline))
            }
        }
    }

    async fn remote_call<T, F>(
        &self,
        service: &'static str,
        deadline: Duration,
        call: F,
    ) -> Result<T, RemoteError>
    where
        F: Future<Output = Result<T, RemoteError>>,
    {
        match tokio::time::timeout(deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(service, ?deadline, "deadline exceeded");
                Err(RemoteError::DeadlineExceeded(deadline))
            }
        }
    }
}

fn advance(state: &mut PlacementState, to: PlacementState) {
    debug_assert!(state.can_transition_to(to), "{state} -> {to}");
    tracing::debug!(from = %state, to = %to, "placement state changed");
    tracing::Span::current().record("state", to.as_str());
    *state = to;
}
