//! Cart store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_DATABASE_URL` - SQLite connection string (falls back to `DATABASE_URL`,
//!   then to `sqlite://corner-shop.db?mode=rwc`)
//! - `CART_MAX_CONNECTIONS` - Connection pool size (default: 5)
//! - `CART_BUSY_TIMEOUT_SECS` - How long a writer waits on a locked database (default: 5)

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://corner-shop.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: &str = "5";
const DEFAULT_BUSY_TIMEOUT_SECS: &str = "5";

/// Connection string for a private, process-local database.
pub const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite connection URL (may embed a path the operator considers private)
    pub database_url: SecretString,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// Time a connection waits on a database lock before giving up
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("CART_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = lookup("CART_MAX_CONNECTIONS")
            .unwrap_or_else(|| DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CART_MAX_CONNECTIONS".to_string(), e.to_string())
            })?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CART_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let busy_timeout_secs = lookup("CART_BUSY_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_BUSY_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CART_BUSY_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            max_connections,
            busy_timeout: Duration::from_secs(busy_timeout_secs),
        })
    }

    /// Configuration for a SQLite database at `url` with default pool settings.
    #[must_use]
    pub fn sqlite(url: &str) -> Self {
        Self {
            database_url: SecretString::from(url.to_string()),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Configuration for a private in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::sqlite(IN_MEMORY_DATABASE_URL)
    }

    /// Returns `true` when the database lives only in this process's memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        let url = self.database_url.expose_secret();
        url.contains(":memory:") || url.contains("mode=memory")
    }
}
