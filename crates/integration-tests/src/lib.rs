//! Integration tests for Corner Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p corner-shop-integration-tests
//! ```
//!
//! Every test opens its own `SQLite` database in a temporary directory, so no
//! external services are needed and tests can run in parallel.
//!
//! # Test Categories
//!
//! - `cart_store` - Store operations, uniqueness and durability
//! - `cart_concurrency` - Concurrent writers on one store
//! - `cart_projections` - Projection refresh and the add/remove flows

use std::path::PathBuf;

use corner_shop_core::CartItem;
use corner_shop_storefront::CartStore;
use corner_shop_storefront::config::StoreConfig;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// A file-backed cart database that lives as long as this value.
pub struct TestDatabase {
    dir: TempDir,
}

impl TestDatabase {
    /// Create an empty temporary directory for the database file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("cart.db")
    }

    /// Store configuration pointing at the database file.
    #[must_use]
    pub fn config(&self) -> StoreConfig {
        StoreConfig::sqlite(&format!("sqlite://{}?mode=rwc", self.path().display()))
    }

    /// Open (or reopen) the cart store on this database.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the database cannot be opened.
    pub async fn open(&self) -> Result<CartStore, corner_shop_storefront::CartError> {
        CartStore::open(&self.config()).await
    }
}

/// A valid cart item priced in cents.
///
/// # Panics
///
/// Panics if `id` is empty.
#[must_use]
pub fn item(id: &str, name: &str, cents: i64, image_src: &str) -> CartItem {
    CartItem::new(id, name, Decimal::new(cents, 2), image_src).expect("valid test item")
}
