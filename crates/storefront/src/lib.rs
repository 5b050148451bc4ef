//! Corner Shop Storefront library.
//!
//! Persistent cart store and the cart service built on it.
//!
//! # Modules
//!
//! - [`db`] - SQLite pool, transaction gateway and the cart store
//! - [`services`] - Cart service: add/remove flows and projection refresh
//! - [`state`] - Explicitly constructed application state
//! - [`config`] - Configuration loaded from the environment
//! - [`error`] - Cart error taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;

pub use db::CartStore;
pub use error::CartError;
