//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod migrate;

use secrecy::SecretString;
use thiserror::Error;

use corner_shop_core::ProductIdError;
use corner_shop_storefront::CartError;
use corner_shop_storefront::config::{ConfigError, StoreConfig};
use corner_shop_storefront::services::CartServiceError;
use corner_shop_storefront::state::AppState;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cart store failed.
    #[error("Cart store error: {0}")]
    Store(#[from] CartError),

    /// A cart flow failed.
    #[error("Cart error: {0}")]
    Service(#[from] CartServiceError),

    /// The id argument could not be parsed.
    #[error("Invalid product id: {0}")]
    InvalidId(#[from] ProductIdError),

    /// No catalog product has this id.
    #[error("No catalog product with id: {0}")]
    UnknownProduct(String),

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load store configuration, letting `--database-url` win over the environment.
fn load_config(database_url: Option<&str>) -> Result<StoreConfig, CommandError> {
    let mut config = StoreConfig::from_env()?;
    if let Some(url) = database_url {
        config.database_url = SecretString::from(url.to_owned());
    }
    Ok(config)
}

/// Open the cart store and build application state.
async fn connect(database_url: Option<&str>) -> Result<AppState, CommandError> {
    let config = load_config(database_url)?;
    Ok(AppState::connect(config).await?)
}
