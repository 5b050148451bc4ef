//! Cart service: the flows the page runs against the cart store.
//!
//! - Catalog click: [`CartService::add_product`]
//! - Row remove button: [`CartService::remove_product`]
//! - Cart page load: [`CartService::load_cart`]
//!
//! Every successful mutation is followed by [`CartService::refresh_projections`],
//! which re-derives the total price, the item count and the empty-state flag.
//! Feedback comes back as a [`CartFeedback`] value; showing it is up to the caller.

use serde::Serialize;
use tracing::instrument;

use corner_shop_core::{CartItem, CartItemError, CurrencyCode, Price, Product, ProductId};

use crate::db::CartStore;
use crate::error::CartError;

/// Errors from cart service flows.
#[derive(Debug, thiserror::Error)]
pub enum CartServiceError {
    /// The cart store rejected or failed the operation.
    #[error(transparent)]
    Store(#[from] CartError),

    /// The catalog product cannot be turned into a cart item.
    #[error("invalid product: {0}")]
    InvalidProduct(#[from] CartItemError),
}

/// Outcome of a cart action, for the caller to present however it likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartFeedback {
    Added,
    AlreadyInCart,
    Removed,
}

impl CartFeedback {
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Added => "Yeah!",
            Self::AlreadyInCart => "Hey!",
            Self::Removed => "Ok",
        }
    }

    #[must_use]
    pub const fn body(&self) -> &'static str {
        match self {
            Self::Added => "You have added a new product to your cart!",
            Self::AlreadyInCart => "This product is already in your cart.",
            Self::Removed => "You have removed a product from your cart.",
        }
    }
}

/// The three values derived from the cart after every mutation.
///
/// A `None` field means that projection's read returned a malformed result
/// and the previously displayed value should be left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartProjections {
    /// Sum of item prices, e.g. `"$17.99"`.
    pub total_price: Option<String>,
    /// Number of items in the cart.
    pub item_count: Option<usize>,
    /// Whether the "your cart is empty" text should be shown.
    pub empty_state_visible: Option<bool>,
}

/// Result of a mutation flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartUpdate {
    pub feedback: CartFeedback,
    /// Present only when the cart actually changed.
    pub projections: Option<CartProjections>,
}

/// Cart row display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image_src: String,
}

impl CartItemView {
    /// Display data for `item`, with its price shown in `currency`.
    #[must_use]
    pub fn new(item: &CartItem, currency: CurrencyCode) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_owned(),
            price: Price::new(item.price(), currency).display(),
            image_src: item.image_src().to_owned(),
        }
    }
}

/// Cart page display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub projections: CartProjections,
}

/// Cart flows over a shared [`CartStore`].
#[derive(Clone)]
pub struct CartService {
    store: CartStore,
    currency: CurrencyCode,
}

impl CartService {
    #[must_use]
    pub const fn new(store: CartStore) -> Self {
        Self {
            store,
            currency: CurrencyCode::USD,
        }
    }

    /// Use `currency` when formatting row prices and the total.
    #[must_use]
    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    /// Get a reference to the underlying cart store.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// Add a catalog product to the cart.
    ///
    /// A product already in the cart is reported as
    /// [`CartFeedback::AlreadyInCart`] rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::InvalidProduct` if the product does not make
    /// a valid cart item, and `CartServiceError::Store` if the store is
    /// unavailable.
    #[instrument(skip_all, fields(id = %product.id))]
    pub async fn add_product(&self, product: &Product) -> Result<CartUpdate, CartServiceError> {
        let item = product.to_cart_item()?;

        match self.store.add_item(&item).await {
            Ok(()) => Ok(CartUpdate {
                feedback: CartFeedback::Added,
                projections: Some(self.refresh_projections().await?),
            }),
            Err(CartError::DuplicateItem(_)) => Ok(CartUpdate {
                feedback: CartFeedback::AlreadyInCart,
                projections: None,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove an item from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Store` if the store is unavailable.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn remove_product(&self, id: &ProductId) -> Result<CartUpdate, CartServiceError> {
        self.store.remove_item(id).await?;

        Ok(CartUpdate {
            feedback: CartFeedback::Removed,
            projections: Some(self.refresh_projections().await?),
        })
    }

    /// Whether the cart holds no items.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the count could not be read.
    pub async fn is_cart_empty(&self) -> Result<bool, CartError> {
        Ok(self.store.count().await? == 0)
    }

    /// Re-derive total price, item count and empty-state visibility.
    ///
    /// Call only after the mutation it reflects has completed. The three reads
    /// are independent and run concurrently.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if any read could not complete.
    /// Malformed results do not fail the refresh; they leave that projection
    /// as `None`.
    pub async fn refresh_projections(&self) -> Result<CartProjections, CartError> {
        let (items, count, empty) = tokio::join!(
            self.store.list_all(),
            self.store.count(),
            self.is_cart_empty(),
        );

        let total = items.and_then(|items| {
            Price::total(items.iter().map(CartItem::price), self.currency)
                .ok_or_else(|| CartError::MalformedResult("cart total overflowed".to_string()))
        });

        Ok(CartProjections {
            total_price: skip_malformed(total, "total_price")?.map(|total| total.display()),
            item_count: skip_malformed(count, "item_count")?,
            empty_state_visible: skip_malformed(empty, "empty_state")?,
        })
    }

    /// List cart rows for rendering, followed by a projection refresh.
    ///
    /// A malformed listing renders no rows.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the store could not be read.
    #[instrument(skip_all)]
    pub async fn load_cart(&self) -> Result<CartView, CartError> {
        let items = skip_malformed(self.store.list_all().await, "cart_rows")?
            .unwrap_or_default()
            .iter()
            .map(|item| CartItemView::new(item, self.currency))
            .collect();

        Ok(CartView {
            items,
            projections: self.refresh_projections().await?,
        })
    }
}

/// Turn a malformed read into "nothing to display" for one projection.
fn skip_malformed<T>(
    result: Result<T, CartError>,
    projection: &'static str,
) -> Result<Option<T>, CartError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(CartError::MalformedResult(reason)) => {
            tracing::warn!(projection, %reason, "Skipping projection update");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use corner_shop_core::Catalog;
    use rust_decimal::Decimal;

    use super::*;

    async fn service() -> CartService {
        CartService::new(CartStore::open_in_memory().await.unwrap())
    }

    fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Product {id}"),
            price: Decimal::new(cents, 2),
            image_src: format!("{id}.png"),
        }
    }

    #[tokio::test]
    async fn test_empty_cart_projections() {
        let service = service().await;
        let projections = service.refresh_projections().await.unwrap();

        assert_eq!(projections.total_price.as_deref(), Some("$0.00"));
        assert_eq!(projections.item_count, Some(0));
        assert_eq!(projections.empty_state_visible, Some(true));
        assert!(service.is_cart_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_add_product_refreshes_projections() {
        let service = service().await;
        let update = service.add_product(&product("p1", 999)).await.unwrap();

        assert_eq!(update.feedback, CartFeedback::Added);
        let projections = update.projections.unwrap();
        assert_eq!(projections.total_price.as_deref(), Some("$9.99"));
        assert_eq!(projections.item_count, Some(1));
        assert_eq!(projections.empty_state_visible, Some(false));
    }

    #[tokio::test]
    async fn test_add_product_twice_reports_already_in_cart() {
        let service = service().await;
        service.add_product(&product("p1", 999)).await.unwrap();
        let update = service.add_product(&product("p1", 999)).await.unwrap();

        assert_eq!(update.feedback, CartFeedback::AlreadyInCart);
        assert!(update.projections.is_none());
        assert_eq!(service.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_product_is_rejected_before_the_store() {
        let service = service().await;
        let err = service.add_product(&product("p1", -100)).await.unwrap_err();

        assert!(matches!(err, CartServiceError::InvalidProduct(_)));
        assert_eq!(service.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove_product() {
        let service = service().await;
        service.add_product(&product("p1", 999)).await.unwrap();
        service.add_product(&product("p2", 101)).await.unwrap();

        let update = service.remove_product(&ProductId::from("p1")).await.unwrap();
        assert_eq!(update.feedback, CartFeedback::Removed);
        let projections = update.projections.unwrap();
        assert_eq!(projections.total_price.as_deref(), Some("$1.01"));
        assert_eq!(projections.item_count, Some(1));
        assert_eq!(projections.empty_state_visible, Some(false));
    }

    #[tokio::test]
    async fn test_price_aggregation() {
        let service = service().await;
        for (id, cents) in [("a", 1000), ("b", 550), ("c", 249)] {
            service.add_product(&product(id, cents)).await.unwrap();
        }

        let projections = service.refresh_projections().await.unwrap();
        assert_eq!(projections.total_price.as_deref(), Some("$17.99"));
        assert_eq!(projections.item_count, Some(3));
    }

    #[tokio::test]
    async fn test_currency_override() {
        let service = service().await.with_currency(CurrencyCode::EUR);
        service.add_product(&product("p1", 250)).await.unwrap();

        let projections = service.refresh_projections().await.unwrap();
        assert_eq!(projections.total_price.as_deref(), Some("€2.50"));
    }

    #[tokio::test]
    async fn test_rows_and_total_share_currency() {
        let service = service().await.with_currency(CurrencyCode::EUR);
        service.add_product(&product("p1", 250)).await.unwrap();

        let view = service.load_cart().await.unwrap();
        let rows: Vec<&str> = view.items.iter().map(|row| row.price.as_str()).collect();
        assert_eq!(rows, vec!["€2.50"]);
        assert_eq!(view.projections.total_price.as_deref(), Some("€2.50"));
    }

    #[tokio::test]
    async fn test_total_overflow_leaves_total_blank() {
        let service = service().await;
        for id in ["big-1", "big-2"] {
            let item = CartItem::new(id, "Huge", Decimal::MAX, "h.png").unwrap();
            service.store().add_item(&item).await.unwrap();
        }

        let projections = service.refresh_projections().await.unwrap();
        assert_eq!(projections.total_price, None);
        assert_eq!(projections.item_count, Some(2));
        assert_eq!(projections.empty_state_visible, Some(false));

        let view = service.load_cart().await.unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.projections.total_price, None);
    }

    #[tokio::test]
    async fn test_load_cart_rows() {
        let service = service().await;
        let catalog = Catalog::builtin();
        let espresso = catalog.find_product_by_id(&ProductId::from("hd-01")).unwrap();
        service.add_product(espresso).await.unwrap();

        let view = service.load_cart().await.unwrap();
        assert_eq!(
            view.items,
            vec![CartItemView {
                id: "hd-01".to_string(),
                name: "Espresso".to_string(),
                price: "$2.50".to_string(),
                image_src: espresso.image_src.clone(),
            }]
        );
        assert_eq!(view.projections.item_count, Some(1));
    }

    #[tokio::test]
    async fn test_unavailable_store_propagates() {
        let service = service().await;
        service.store().close().await;

        assert!(matches!(
            service.add_product(&product("p1", 100)).await,
            Err(CartServiceError::Store(CartError::StoreUnavailable(_)))
        ));
        assert!(service.refresh_projections().await.is_err());
        assert!(service.load_cart().await.is_err());
    }

    #[test]
    fn test_feedback_text() {
        assert_eq!(CartFeedback::Added.title(), "Yeah!");
        assert_eq!(
            CartFeedback::AlreadyInCart.body(),
            "This product is already in your cart."
        );
        assert_eq!(CartFeedback::Removed.title(), "Ok");
    }

    #[test]
    fn test_skip_malformed() {
        assert_eq!(skip_malformed(Ok(3), "x").unwrap(), Some(3));
        assert_eq!(
            skip_malformed::<u8>(Err(CartError::MalformedResult("bad".into())), "x").unwrap(),
            None
        );
        assert!(skip_malformed::<u8>(Err(CartError::StoreUnavailable("down".into())), "x").is_err());
    }
}
