//! Environment-driven configuration.
//!
//! Every value has a default suitable for local development; anything can
//! be overridden through the environment (a `.env` file is honoured by the
//! binary). Configuration is read once at startup and passed explicitly
//! into client and router construction so nothing reads ambient state.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Process configuration for the controller.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Base URL of the dataset registry API.
    pub dataset_api_url: String,
    /// Base URL of the collection (workflow) store.
    pub collection_api_url: String,
    /// Base URL of the topics taxonomy service.
    pub topics_api_url: String,
    /// How long in-flight requests get to finish on shutdown.
    pub graceful_shutdown_timeout: Duration,
    /// Page size for batched registry list calls.
    pub datasets_batch_size: usize,
    /// Concurrent fetch workers for batched registry list calls.
    pub datasets_batch_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:24000".to_string(),
            dataset_api_url: "http://localhost:22000".to_string(),
            collection_api_url: "http://localhost:8082".to_string(),
            topics_api_url: "http://localhost:8080".to_string(),
            graceful_shutdown_timeout: Duration::from_secs(5),
            datasets_batch_size: 100,
            datasets_batch_workers: 10,
        }
    }
}

impl Config {
    /// Build the configuration from the environment, falling back to the
    /// defaults above for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            bind_addr: env_or("BIND_ADDR", defaults.bind_addr),
            dataset_api_url: env_or("DATASET_API_URL", defaults.dataset_api_url),
            collection_api_url: env_or("COLLECTION_API_URL", defaults.collection_api_url),
            topics_api_url: env_or("TOPICS_API_URL", defaults.topics_api_url),
            graceful_shutdown_timeout: Duration::from_secs(env_parsed(
                "GRACEFUL_SHUTDOWN_TIMEOUT_SECS",
                defaults.graceful_shutdown_timeout.as_secs(),
            )?),
            datasets_batch_size: env_parsed("DATASET_BATCH_SIZE", defaults.datasets_batch_size)?,
            datasets_batch_workers: env_parsed(
                "DATASET_BATCH_WORKERS",
                defaults.datasets_batch_workers,
            )?,
        })
    }
}

fn env_or(var: &'static str, default: String) -> String {
    std::env::var(var).unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}
