//! Cart store: the persisted set of cart items.
//!
//! The store is the only component that opens transactions on the
//! `cart_items` collection. It holds no cache; every query re-reads the
//! database.

use tokio::sync::broadcast;
use tracing::instrument;

use corner_shop_core::{CartItem, ProductId};

use super::gateway::{CART_ITEMS, ReadOnly, ReadWrite, TransactionCompleted, TransactionGateway};
use super::{create_pool, provision};
use crate::config::StoreConfig;
use crate::error::CartError;

/// Persistent set of cart items keyed by product id.
///
/// Construct one per application with [`CartStore::open`] and hand clones to
/// every collaborator; clones share the same database.
#[derive(Clone)]
pub struct CartStore {
    gateway: TransactionGateway,
}

impl CartStore {
    /// Wrap an existing gateway. The schema must already be provisioned.
    #[must_use]
    pub const fn new(gateway: TransactionGateway) -> Self {
        Self { gateway }
    }

    /// Open the configured database and provision its schema.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the database cannot be opened
    /// or its schema does not match this build.
    pub async fn open(config: &StoreConfig) -> Result<Self, CartError> {
        let pool = create_pool(config).await?;
        provision(&pool).await?;
        tracing::info!(max_connections = config.max_connections, "Cart store opened");
        Ok(Self::new(TransactionGateway::new(pool)))
    }

    /// Open a private in-memory store, mostly useful for tests.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if `SQLite` cannot be initialized.
    pub async fn open_in_memory() -> Result<Self, CartError> {
        Self::open(&StoreConfig::in_memory()).await
    }

    /// Add an item to the cart.
    ///
    /// The existence check and the insert run in one write transaction, so two
    /// concurrent adds of the same id can never both succeed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::DuplicateItem` if an item with the same id is
    /// already stored, and `CartError::StoreUnavailable` if the write could
    /// not complete. In both cases the store is unchanged.
    #[instrument(skip_all, fields(id = %item.id()))]
    pub async fn add_item(&self, item: &CartItem) -> Result<(), CartError> {
        let mut tx = self.gateway.open::<ReadWrite>(CART_ITEMS).await?;

        if tx.get(item.id()).await?.is_some() {
            tracing::debug!("Item already in cart");
            return Err(CartError::DuplicateItem(item.id().clone()));
        }

        tx.insert(item).await?;
        tx.commit().await?;

        tracing::info!("Item added to cart");
        Ok(())
    }

    /// Remove the item stored under `id`.
    ///
    /// Removing an id that is not in the cart succeeds.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the write could not complete.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn remove_item(&self, id: &ProductId) -> Result<(), CartError> {
        let mut tx = self.gateway.open::<ReadWrite>(CART_ITEMS).await?;
        let removed = tx.delete(id).await?;
        tx.commit().await?;

        if removed {
            tracing::info!("Item removed from cart");
        } else {
            tracing::debug!("Item was not in cart");
        }
        Ok(())
    }

    /// Number of items in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the read could not complete.
    pub async fn count(&self) -> Result<usize, CartError> {
        let mut tx = self.gateway.open::<ReadOnly>(CART_ITEMS).await?;
        let count = tx.count().await?;
        tx.commit().await?;
        Ok(count)
    }

    /// Every item in the cart, in no meaningful order.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the read could not complete
    /// and `CartError::MalformedResult` if a stored record does not decode.
    pub async fn list_all(&self) -> Result<Vec<CartItem>, CartError> {
        let mut tx = self.gateway.open::<ReadOnly>(CART_ITEMS).await?;
        let items = tx.get_all().await?;
        tx.commit().await?;
        Ok(items)
    }

    /// Subscribe to write completion signals.
    #[must_use]
    pub fn subscribe_completions(&self) -> broadcast::Receiver<TransactionCompleted> {
        self.gateway.subscribe()
    }

    /// Get a reference to the transaction gateway.
    #[must_use]
    pub const fn gateway(&self) -> &TransactionGateway {
        &self.gateway
    }

    /// Shut the database down. Every later operation fails with
    /// `CartError::StoreUnavailable`.
    pub async fn close(&self) {
        self.gateway.close().await;
        tracing::info!("Cart store closed");
    }
}
