//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cs-cli migrate
//! cs-cli --database-url sqlite://cart.db?mode=rwc migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CART_DATABASE_URL` - SQLite connection string for the cart store
//!
//! # Migration Files
//!
//! Cart migrations live in `crates/storefront/migrations/` and are embedded
//! into the binary at build time.

use corner_shop_storefront::CartError;
use corner_shop_storefront::db::{create_pool, provision};

use super::{CommandError, load_config};

/// Apply the cart schema migrations.
pub async fn run(database_url: Option<&str>) -> Result<(), CommandError> {
    let config = load_config(database_url)?;

    tracing::info!("Connecting to cart database...");
    let pool = create_pool(&config).await.map_err(CartError::from)?;

    tracing::info!("Running cart migrations...");
    provision(&pool).await.map_err(CartError::from)?;
    pool.close().await;

    tracing::info!("Cart migrations complete!");
    Ok(())
}
