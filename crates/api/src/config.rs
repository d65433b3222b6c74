//! Application configuration loaded from environment variables.

use common::Money;
use domain::PricePolicy;
use rust_decimal::Decimal;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: PostgreSQL URL; the in-memory store is used when unset
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `MAX_ITEM_PRICE`: exclusive upper bound for line-item prices
///   (default: `100000000`)
/// - `SEED_ITEMS`: comma-separated item names loaded into an empty catalog
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub max_item_price: Money,
    pub seed_items: Vec<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.database_max_connections),
            max_item_price: std::env::var("MAX_ITEM_PRICE")
                .ok()
                .and_then(|p| parse_max_price(&p))
                .unwrap_or(defaults.max_item_price),
            seed_items: std::env::var("SEED_ITEMS")
                .map(|names| parse_item_names(&names))
                .unwrap_or_default(),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn price_policy(&self) -> PricePolicy {
        PricePolicy::new(self.max_item_price)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            database_max_connections: 5,
            max_item_price: Money::from_units(PricePolicy::DEFAULT_MAX_PRICE),
            seed_items: Vec::new(),
        }
    }
}

fn parse_max_price(value: &str) -> Option<Money> {
    value
        .trim()
        .parse::<Decimal>()
        .ok()
        .map(Money::new)
        .filter(Money::is_positive)
}

fn parse_item_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert!(config.database_url.is_none());
        assert_eq!(config.max_item_price, Money::from_units(100_000_000));
        assert!(config.seed_items.is_empty());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_addr_default() {
        let config = Config::default();
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_parse_max_price() {
        assert_eq!(parse_max_price(" 500 "), Some(Money::from_units(500)));
        assert_eq!(parse_max_price("0"), None);
        assert_eq!(parse_max_price("lots"), None);
    }

    #[test]
    fn test_parse_item_names() {
        assert_eq!(
            parse_item_names("Soup, Salad,,Tea "),
            vec!["Soup".to_string(), "Salad".to_string(), "Tea".to_string()]
        );
        assert!(parse_item_names("").is_empty());
    }

    #[test]
    fn test_price_policy_uses_configured_bound() {
        let config = Config {
            max_item_price: Money::from_units(20),
            ..Config::default()
        };
        assert_eq!(config.price_policy().max_price(), Money::from_units(20));
    }

    #[test]
    fn test_price_policy_caps_oversized_bound() {
        let config = Config {
            max_item_price: parse_max_price("500000000").unwrap(),
            ..Config::default()
        };
        assert_eq!(
            config.price_policy().max_price(),
            Money::from_units(100_000_000)
        );
    }
}
