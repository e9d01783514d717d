//! Configuration management for the Ice Watch backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with ICEWATCH_ prefix
//! 4. The plain `PORT` and `COSMOS_*` variables used by existing deployments

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Cosmos DB configuration
    pub cosmos: CosmosConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Directory holding the dashboard frontend bundle
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CosmosConfig {
    /// Account endpoint, e.g. `https://<account>.documents.azure.com:443/`
    pub endpoint: String,

    /// Base64 account master key
    pub key: String,

    /// Database name
    pub database: String,

    /// Container holding the sensor aggregates
    pub container: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Route each query to the location's partition
    pub partition_by_location: bool,
}

/// Errors raised while loading configuration at startup
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Source(#[from] ConfigError),

    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfiguration(Vec<&'static str>),
}

impl Config {
    /// Load configuration from files and environment variables, then check
    /// that every required store setting is present.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let environment =
            std::env::var("ICEWATCH_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let legacy = |name: &str| std::env::var(name).ok();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "public")?
            .set_default("cosmos.endpoint", "")?
            .set_default("cosmos.key", "")?
            .set_default("cosmos.database", "")?
            .set_default("cosmos.container", "")?
            .set_default("cosmos.request_timeout_secs", 30)?
            .set_default("cosmos.partition_by_location", true)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (ICEWATCH_ prefix)
            .add_source(
                Environment::with_prefix("ICEWATCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Plain variable names win over everything else
            .set_override_option("server.port", legacy("PORT"))?
            .set_override_option("cosmos.endpoint", legacy("COSMOS_ENDPOINT"))?
            .set_override_option("cosmos.key", legacy("COSMOS_KEY"))?
            .set_override_option("cosmos.database", legacy("COSMOS_DB_NAME"))?
            .set_override_option("cosmos.container", legacy("COSMOS_CONTAINER_NAME"))?
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Report every required setting that is absent or blank
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let cosmos = &self.cosmos;
        let missing: Vec<&'static str> = [
            ("COSMOS_ENDPOINT", &cosmos.endpoint),
            ("COSMOS_KEY", &cosmos.key),
            ("COSMOS_DB_NAME", &cosmos.database),
            ("COSMOS_CONTAINER_NAME", &cosmos.container),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigLoadError::MissingConfiguration(missing))
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            static_dir: PathBuf::from("public"),
        }
    }
}
