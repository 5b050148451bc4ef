//! Application state shared across cart collaborators.

use std::sync::Arc;

use corner_shop_core::Catalog;

use crate::config::StoreConfig;
use crate::db::CartStore;
use crate::error::CartError;
use crate::services::CartService;

/// Application state shared across all collaborators.
///
/// Created once at startup and passed by handle to everything that needs the
/// cart. This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StoreConfig,
    store: CartStore,
    catalog: Catalog,
}

impl AppState {
    /// Create a new application state from already opened parts.
    #[must_use]
    pub fn new(config: StoreConfig, store: CartStore, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
            }),
        }
    }

    /// Open the configured cart store and pair it with the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the store cannot be opened.
    pub async fn connect(config: StoreConfig) -> Result<Self, CartError> {
        let store = CartStore::open(&config).await?;
        Ok(Self::new(config, store, Catalog::builtin()))
    }

    /// Get a reference to the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.inner.store
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// A cart service over the shared store.
    #[must_use]
    pub fn cart(&self) -> CartService {
        CartService::new(self.inner.store.clone())
    }

    /// Shut the cart store down.
    pub async fn shutdown(&self) {
        self.inner.store.close().await;
    }
}
