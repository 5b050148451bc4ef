//! Cart error taxonomy.
//!
//! Every cart store operation returns `Result<T, CartError>`. The store never
//! retries; callers decide whether to retry, notify, or ignore.

use corner_shop_core::{CartItemError, ProductId, ProductIdError};
use thiserror::Error;

/// Errors returned by the transaction gateway and the cart store.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item with this id is already in the cart.
    ///
    /// Expected when a user adds the same product twice; state is untouched.
    #[error("item already in cart: {0}")]
    DuplicateItem(ProductId),

    /// The persistent medium could not be opened or a transaction could not complete.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A persisted record did not have the expected shape.
    #[error("malformed result: {0}")]
    MalformedResult(String),
}

impl CartError {
    /// Returns `true` for [`CartError::DuplicateItem`].
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateItem(_))
    }

    /// Returns `true` for [`CartError::StoreUnavailable`].
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<sqlx::Error> for CartError {
    fn from(e: sqlx::Error) -> Self {
        Self::StoreUnavailable(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for CartError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Self::StoreUnavailable(format!("schema migration failed: {e}"))
    }
}

impl From<ProductIdError> for CartError {
    fn from(e: ProductIdError) -> Self {
        Self::MalformedResult(format!("invalid product id in store: {e}"))
    }
}

impl From<CartItemError> for CartError {
    fn from(e: CartItemError) -> Self {
        Self::MalformedResult(format!("invalid cart item in store: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::DuplicateItem(ProductId::from("p1"));
        assert_eq!(err.to_string(), "item already in cart: p1");

        let err = CartError::StoreUnavailable("pool closed".to_string());
        assert_eq!(err.to_string(), "store unavailable: pool closed");
    }

    #[test]
    fn test_sqlx_errors_are_unavailable() {
        let err = CartError::from(sqlx::Error::PoolClosed);
        assert!(err.is_unavailable());
        assert!(!err.is_duplicate());
    }

    #[test]
    fn test_decode_errors_are_malformed() {
        let err = CartError::from(ProductIdError::UnknownKind("uuid".to_string()));
        assert!(matches!(err, CartError::MalformedResult(_)));

        let err = CartError::from(CartItemError::EmptyId);
        assert!(matches!(err, CartError::MalformedResult(_)));
    }
}
