use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::OrderId;
use domain::{Order, Product, ProductCode};
use tokio::sync::RwLock;

use crate::{OrderRepository, ProductCatalog, Result, StorageError};

#[derive(Debug, Default)]
struct InMemoryState {
    products: HashMap<ProductCode, Product>,
    orders: BTreeMap<OrderId, Order>,
    next_id: i64,
    lookup_calls: usize,
    save_calls: usize,
    fail_lookups: bool,
    fail_saves: bool,
    lookup_delay: Option<Duration>,
    save_delay: Option<Duration>,
}

/// In-memory product catalog and order repository.
///
/// Used for local runs without a database and as a test double: failures
/// and delays can be injected, and calls are counted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding products with the given codes.
    pub fn with_products<I, C>(codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ProductCode>,
    {
        let products = codes
            .into_iter()
            .map(|code| {
                let code = code.into();
                let product = Product::new(code.clone(), code.to_string(), 0);
                (code, product)
            })
            .collect();

        Self {
            state: Arc::new(RwLock::new(InMemoryState {
                products,
                ..InMemoryState::default()
            })),
        }
    }

    /// Adds or replaces a product.
    pub async fn insert_product(&self, product: Product) {
        self.state
            .write()
            .await
            .products
            .insert(product.code.clone(), product);
    }

    /// Makes every product lookup fail.
    pub async fn set_fail_lookups(&self, fail: bool) {
        self.state.write().await.fail_lookups = fail;
    }

    /// Makes every order save fail.
    pub async fn set_fail_saves(&self, fail: bool) {
        self.state.write().await.fail_saves = fail;
    }

    /// Delays every product lookup.
    pub async fn set_lookup_delay(&self, delay: Option<Duration>) {
        self.state.write().await.lookup_delay = delay;
    }

    /// Delays every order save.
    pub async fn set_save_delay(&self, delay: Option<Duration>) {
        self.state.write().await.save_delay = delay;
    }

    /// Returns how many product lookups were attempted.
    pub async fn lookup_calls(&self) -> usize {
        self.state.read().await.lookup_calls
    }

    /// Returns how many order saves were attempted.
    pub async fn save_calls(&self) -> usize {
        self.state.read().await.save_calls
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    async fn begin_lookup(&self) -> Result<()> {
        let delay = {
            let mut state = self.state.write().await;
            state.lookup_calls += 1;
            if state.fail_lookups {
                return Err(StorageError::Unavailable(
                    "product lookup failed".to_string(),
                ));
            }
            state.lookup_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryStore {
    async fn exists(&self, code: &ProductCode) -> Result<bool> {
        self.begin_lookup().await?;
        Ok(self.state.read().await.products.contains_key(code))
    }

    async fn find(&self, code: &ProductCode) -> Result<Option<Product>> {
        self.begin_lookup().await?;
        Ok(self.state.read().await.products.get(code).cloned())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn save(&self, order: &Order) -> Result<OrderId> {
        let delay = {
            let mut state = self.state.write().await;
            state.save_calls += 1;
            if state.fail_saves {
                return Err(StorageError::Unavailable("order save failed".to_string()));
            }
            state.save_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = OrderId::new(state.next_id);

        let stored = Order::restore(
            id,
            order.customer_id(),
            order.items().to_vec(),
            order.total_price(),
            order.delivery_days(),
        );
        state.orders.insert(id, stored);

        Ok(id)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.read().await.orders.get(&id).cloned())
    }
}
