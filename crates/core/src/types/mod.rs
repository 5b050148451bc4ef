//! Core types for Corner Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart_item;
pub mod id;
pub mod price;

pub use cart_item::{CartItem, CartItemError};
pub use id::{ProductId, ProductIdError, ProductIdKind};
pub use price::{CurrencyCode, Price};
