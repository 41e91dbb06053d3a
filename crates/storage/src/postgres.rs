use async_trait::async_trait;
use common::{CustomerId, Money, OrderId};
use domain::{Order, OrderItem, Product, ProductCode};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{OrderRepository, ProductCatalog, Result, StorageError};

/// PostgreSQL-backed product catalog and order repository.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Inserts a product, or updates name and stock if the code already exists.
    pub async fn upsert_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (product_code, name, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_code) DO UPDATE
            SET name = EXCLUDED.name, quantity = EXCLUDED.quantity
            "#,
        )
        .bind(product.code.as_str())
        .bind(&product.name)
        .bind(product.quantity)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            code: ProductCode::new(row.try_get::<String, _>("product_code")?),
            name: row.try_get("name")?,
            quantity: row.try_get("quantity")?,
        })
    }

    fn row_to_item(row: PgRow) -> Result<OrderItem> {
        let product_code: String = row.try_get("product_code")?;
        let quantity: i32 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity).map_err(|_| {
            StorageError::InvalidData(format!("negative quantity {quantity} for {product_code}"))
        })?;

        Ok(OrderItem::new(
            product_code,
            Money::from_cents(row.try_get("unit_price_cents")?),
            quantity,
        ))
    }
}

#[async_trait]
impl ProductCatalog for PostgresStore {
    #[tracing::instrument(skip(self, code), fields(code = %code))]
    async fn exists(&self, code: &ProductCode) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE product_code = $1)")
                .bind(code.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn find(&self, code: &ProductCode) -> Result<Option<Product>> {
        let row = sqlx::query(
            "SELECT product_code, name, quantity FROM products WHERE product_code = $1",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }
}

#[async_trait]
impl OrderRepository for PostgresStore {
    #[tracing::instrument(skip(self, order), fields(customer_id = %order.customer_id()))]
    async fn save(&self, order: &Order) -> Result<OrderId> {
        let mut tx = self.pool.begin().await?;

        let delivery_days = order
            .delivery_days()
            .map(i32::try_from)
            .transpose()
            .map_err(|_| StorageError::InvalidData("delivery days out of range".to_string()))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (customer_id, total_price_cents, delivery_days)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(order.customer_id().as_i64())
        .bind(order.total_price().cents())
        .bind(delivery_days)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in order.items().iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| StorageError::InvalidData("too many order items".to_string()))?;
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                StorageError::InvalidData(format!(
                    "quantity {} for {} out of range",
                    item.quantity, item.product_code
                ))
            })?;

            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, position, product_code, unit_price_cents, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(id)
            .bind(position)
            .bind(item.product_code.as_str())
            .bind(item.unit_price.cents())
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(order_id = id, items = order.items().len(), "order saved");

        Ok(OrderId::new(id))
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let Some(row) = sqlx::query(
            "SELECT customer_id, total_price_cents, delivery_days FROM orders WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let customer_id: i64 = row.try_get("customer_id")?;
        let total_cents: i64 = row.try_get("total_price_cents")?;
        let delivery_days: Option<i32> = row.try_get("delivery_days")?;
        let delivery_days = delivery_days
            .map(u32::try_from)
            .transpose()
            .map_err(|_| StorageError::InvalidData(format!("negative delivery days on order {id}")))?;

        let items = sqlx::query(
            r#"
            SELECT product_code, unit_price_cents, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Self::row_to_item)
        .collect::<Result<Vec<_>>>()?;

        Ok(Some(Order::restore(
            id,
            CustomerId::new(customer_id),
            items,
            Money::from_cents(total_cents),
            delivery_days,
        )))
    }
}
