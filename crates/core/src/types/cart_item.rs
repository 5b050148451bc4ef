//! Cart item type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Errors that can occur when building a [`CartItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartItemError {
    /// The id is an empty string.
    #[error("cart item id cannot be empty")]
    EmptyId,
    /// The price is below zero.
    #[error("cart item price cannot be negative: {0}")]
    NegativePrice(Decimal),
}

/// One product placed in the cart.
///
/// ## Constraints
///
/// - `id` must not be an empty string
/// - `price` must not be negative
///
/// `name` and `image_src` are opaque and never inspected.
///
/// ## Examples
///
/// ```
/// use corner_shop_core::{CartItem, ProductId};
/// use rust_decimal::Decimal;
///
/// let item = CartItem::new("p1", "Widget", Decimal::new(999, 2), "w.png").unwrap();
/// assert_eq!(item.id(), &ProductId::from("p1"));
///
/// assert!(CartItem::new("p2", "Refund", Decimal::new(-1, 0), "r.png").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartItemFields")]
pub struct CartItem {
    id: ProductId,
    name: String,
    price: Decimal,
    image_src: String,
}

impl CartItem {
    /// Build a validated cart item.
    ///
    /// # Errors
    ///
    /// Returns `CartItemError::EmptyId` for an empty text id and
    /// `CartItemError::NegativePrice` for a price below zero.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        image_src: impl Into<String>,
    ) -> Result<Self, CartItemError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CartItemError::EmptyId);
        }
        if price.is_sign_negative() && !price.is_zero() {
            return Err(CartItemError::NegativePrice(price));
        }

        Ok(Self {
            id,
            name: name.into(),
            price,
            image_src: image_src.into(),
        })
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub fn image_src(&self) -> &str {
        &self.image_src
    }
}

/// Unvalidated wire shape; deserialization routes through [`CartItem::new`].
#[derive(Deserialize)]
struct CartItemFields {
    id: ProductId,
    name: String,
    price: Decimal,
    image_src: String,
}

impl TryFrom<CartItemFields> for CartItem {
    type Error = CartItemError;

    fn try_from(fields: CartItemFields) -> Result<Self, Self::Error> {
        Self::new(fields.id, fields.name, fields.price, fields.image_src)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let item = CartItem::new("p1", "Widget", Decimal::new(999, 2), "w.png").unwrap();
        assert_eq!(item.id(), &ProductId::from("p1"));
        assert_eq!(item.name(), "Widget");
        assert_eq!(item.price(), Decimal::new(999, 2));
        assert_eq!(item.image_src(), "w.png");
    }

    #[test]
    fn test_zero_price_allowed() {
        assert!(CartItem::new(3_i64, "Sample", Decimal::ZERO, "s.png").is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            CartItem::new("p1", "Widget", Decimal::new(-1, 2), "w.png"),
            Err(CartItemError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(matches!(
            CartItem::new("", "Widget", Decimal::ONE, "w.png"),
            Err(CartItemError::EmptyId)
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: CartItem = serde_json::from_str(
            r#"{"id":1,"name":"Widget","price":"2.50","image_src":"w.png"}"#,
        )
        .unwrap();
        assert_eq!(ok.id(), &ProductId::Number(1));
        assert_eq!(ok.price(), Decimal::new(250, 2));

        let bad = serde_json::from_str::<CartItem>(
            r#"{"id":"p1","name":"Widget","price":"-2.50","image_src":"w.png"}"#,
        );
        assert!(bad.is_err());
    }
}
