//! Storage collaborators for order placement.
//!
//! Two ports live here:
//! - [`ProductCatalog`] answers whether a product code exists
//! - [`OrderRepository`] persists orders and assigns their identifiers
//!
//! Both are implemented in memory (for tests and local runs) and on PostgreSQL.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StorageError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::{OrderRepository, ProductCatalog};
