//! Corner Shop Core - Shared types library.
//!
//! This crate provides common types used across all Corner Shop components:
//! - `storefront` - Cart persistence and the cart service
//! - `cli` - Command-line host for the cart
//!
//! # Architecture
//!
//! The core crate contains only types and static reference data - no I/O,
//! no database access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices and cart items
//! - [`catalog`] - The static product catalog, grouped by category

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use catalog::{Catalog, CategoryName, Product};
pub use types::*;
