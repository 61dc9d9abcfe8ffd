//! Configuration management for the stock-order ledger service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with LEDGER_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::CommodityType;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Remote persistence service
    pub remote: RemoteConfig,

    /// Commodity handled by this deployment
    pub commodity: CommodityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Base URL of the persistence API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Bearer token sent with every request
    pub api_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommodityConfig {
    pub commodity_type: CommodityType,

    /// Currency used when a lot carries none
    pub currency: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("LEDGER_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("remote.base_url", "http://localhost:8080/api")?
            .set_default("remote.timeout_secs", 30)?
            .set_default("commodity.commodity_type", "cocoa")?
            .set_default("commodity.currency", "EUR")?
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // LEDGER__REMOTE__BASE_URL, LEDGER__COMMODITY__COMMODITY_TYPE, ...
            .add_source(
                Environment::with_prefix("LEDGER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(commodity_type: CommodityType) -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            remote: RemoteConfig {
                base_url: "http://localhost:0".to_string(),
                timeout_secs: 1,
                api_token: None,
            },
            commodity: CommodityConfig {
                commodity_type,
                currency: "EUR".to_string(),
            },
        }
    }
}
