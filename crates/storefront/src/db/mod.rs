//! Database operations for the cart `SQLite` store.
//!
//! ## Tables
//!
//! - `cart_items` - Products placed in the cart, keyed by product id
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/`, embedded at
//! compile time, and applied via:
//! ```bash
//! cargo run -p corner-shop-cli -- migrate
//! ```

pub mod cart_items;
pub mod gateway;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::config::StoreConfig;

pub use cart_items::CartStore;
pub use gateway::{CART_ITEMS, CartTransaction, ReadOnly, ReadWrite, TransactionCompleted};

/// Create a `SQLite` connection pool for the configured database.
///
/// File databases use WAL journaling so readers never wait on a writer.
/// In-memory databases are private to one connection, so the pool is pinned
/// to a single connection that is never recycled.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be opened.
pub async fn create_pool(config: &StoreConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(config.database_url.expose_secret())?
        .busy_timeout(config.busy_timeout)
        .foreign_keys(true);

    if config.is_in_memory() {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(
            options
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
        )
        .await
}

/// Apply the embedded schema migrations.
///
/// # Errors
///
/// Returns `MigrateError` if the database holds migrations this build does
/// not know about, or if applying a migration fails.
pub async fn provision(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
