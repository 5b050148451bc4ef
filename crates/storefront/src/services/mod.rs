//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Add/remove flows over the cart store and projection refresh

pub mod cart;

pub use cart::{
    CartFeedback, CartItemView, CartProjections, CartService, CartServiceError, CartUpdate,
    CartView,
};
