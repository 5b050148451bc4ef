//! Static product catalog.
//!
//! The catalog is reference data: it is built once, read by the catalog
//! listing and the add-to-cart flow, and never written back.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CartItem, CartItemError, CurrencyCode, Price, ProductId};

/// A category key such as `cold_drinks`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable heading: underscores become spaces.
    #[must_use]
    pub fn title(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_src: String,
}

impl Product {
    /// Build the cart item recorded when this product is added to the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartItemError` if the product carries an empty id or a
    /// negative price.
    pub fn to_cart_item(&self) -> Result<CartItem, CartItemError> {
        CartItem::new(
            self.id.clone(),
            self.name.clone(),
            self.price,
            self.image_src.clone(),
        )
    }

    /// Price formatted for the catalog listing.
    #[must_use]
    pub fn display_price(&self) -> String {
        Price::new(self.price, CurrencyCode::USD).display()
    }
}

/// Products grouped by category, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<(CategoryName, Vec<Product>)>,
}

impl Catalog {
    /// Build a catalog from explicit categories.
    #[must_use]
    pub const fn new(categories: Vec<(CategoryName, Vec<Product>)>) -> Self {
        Self { categories }
    }

    /// The shop's built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        fn product(id: &str, name: &str, cents: i64, image_src: &str) -> Product {
            Product {
                id: ProductId::from(id),
                name: name.to_owned(),
                price: Decimal::new(cents, 2),
                image_src: image_src.to_owned(),
            }
        }

        Self::new(vec![
            (
                CategoryName::new("hot_drinks"),
                vec![
                    product("hd-01", "Espresso", 250, "assets/img/espresso.webp"),
                    product("hd-02", "Flat White", 375, "assets/img/flat-white.webp"),
                    product("hd-03", "Chai Latte", 420, "assets/img/chai-latte.webp"),
                ],
            ),
            (
                CategoryName::new("cold_drinks"),
                vec![
                    product("cd-01", "Iced Americano", 350, "assets/img/iced-americano.webp"),
                    product("cd-02", "Lemonade", 299, "assets/img/lemonade.webp"),
                ],
            ),
            (
                CategoryName::new("baked_goods"),
                vec![
                    product("bg-01", "Butter Croissant", 325, "assets/img/croissant.webp"),
                    product("bg-02", "Banana Bread", 449, "assets/img/banana-bread.webp"),
                    product("bg-03", "Cinnamon Roll", 399, "assets/img/cinnamon-roll.webp"),
                ],
            ),
        ])
    }

    /// Categories with their products, in display order.
    pub fn categories(&self) -> impl Iterator<Item = (&CategoryName, &[Product])> {
        self.categories
            .iter()
            .map(|(name, products)| (name, products.as_slice()))
    }

    /// Every product across all categories, in category order.
    pub fn flat_products(&self) -> impl Iterator<Item = &Product> {
        self.categories
            .iter()
            .flat_map(|(_, products)| products.iter())
    }

    /// Find a product by exact id.
    ///
    /// Numeric and text ids never match each other.
    #[must_use]
    pub fn find_product_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.flat_products().find(|product| &product.id == id)
    }
}
