//! Service configuration loaded from environment variables.

use std::time::Duration;

/// Settings shared by every server binary.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `APPLICATION_PORT`: listen port (default depends on the service)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `METRICS_PORT`: Prometheus listener port (disabled when unset)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub metrics_port: Option<u16>,
}

impl ServerConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env(default_port: u16) -> Self {
        Self::from_lookup(default_port, env_lookup)
    }

    /// Loads configuration through `lookup` instead of the process environment.
    pub fn from_lookup<F>(default_port: u16, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "APPLICATION_PORT", default_port),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            metrics_port: lookup("METRICS_PORT").and_then(|p| p.parse().ok()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Order service settings.
///
/// On top of [`ServerConfig`] (default port `3000`):
/// - `PAYMENT_SERVICE_URL` (default: `http://127.0.0.1:3001`)
/// - `SHIPPING_SERVICE_URL` (default: `http://127.0.0.1:3002`)
/// - `DATABASE_URL`: PostgreSQL; in-memory storage when unset
/// - `SEED_PRODUCTS`: comma separated product codes for in-memory storage
/// - `PAYMENT_DEADLINE_MS`, `SHIPPING_DEADLINE_MS` (default: `2000`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderServiceConfig {
    pub server: ServerConfig,
    pub payment_url: String,
    pub shipping_url: String,
    pub database_url: Option<String>,
    pub seed_products: Vec<String>,
    pub payment_deadline: Duration,
    pub shipping_deadline: Duration,
}

impl OrderServiceConfig {
    pub const DEFAULT_PORT: u16 = 3000;

    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed_products = lookup("SEED_PRODUCTS")
            .unwrap_or_else(|| "prod1,prod2,prod3,prod4".to_string())
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            server: ServerConfig::from_lookup(Self::DEFAULT_PORT, &lookup),
            payment_url: lookup("PAYMENT_SERVICE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:3001".to_string()),
            shipping_url: lookup("SHIPPING_SERVICE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:3002".to_string()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            seed_products,
            payment_deadline: Duration::from_millis(parse_or(&lookup, "PAYMENT_DEADLINE_MS", 2000)),
            shipping_deadline: Duration::from_millis(parse_or(
                &lookup,
                "SHIPPING_DEADLINE_MS",
                2000,
            )),
        }
    }
}

/// Payment stub settings: [`ServerConfig`] (default port `3001`) plus
/// `PAYMENT_DELAY_MS`, an artificial delay before each answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentServiceConfig {
    pub server: ServerConfig,
    pub delay: Option<Duration>,
}

impl PaymentServiceConfig {
    pub const DEFAULT_PORT: u16 = 3001;

    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let delay_ms: u64 = parse_or(&lookup, "PAYMENT_DELAY_MS", 0);
        Self {
            server: ServerConfig::from_lookup(Self::DEFAULT_PORT, &lookup),
            delay: (delay_ms > 0).then(|| Duration::from_millis(delay_ms)),
        }
    }
}

/// Shipping service settings; default port `3002`.
pub const SHIPPING_DEFAULT_PORT: u16 = 3002;

/// Demo client settings: `ORDER_SERVICE_URL` (default: `http://127.0.0.1:3000`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub order_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            order_url: lookup("ORDER_SERVICE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:3000".to_string()),
        }
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
