//! # volcart-core
//!
//! Core types and traits for the volcart checkout service.
//!
//! This crate provides:
//! - `ProductCatalog` and `Price` for the static catalog
//! - `parse_size_to_liters` / `parse_size_to_milliliters` for free-text size descriptors
//! - `ShippingPolicy` for the tiered shipping table
//! - `PricingEngine`, which turns cart lines into a priced `Order`
//! - `PaymentStrategy` trait for payment providers
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use volcart_core::{CartLine, PricingEngine, Quantity};
//!
//! let engine = PricingEngine::from_toml(&std::fs::read_to_string("config/catalog.toml")?)?;
//!
//! let order = engine.quote(&[
//!     CartLine::new("gs-1l", Quantity::clamped(2)).with_size("1L"),
//! ])?;
//!
//! let session = strategy.create_checkout(&order, &urls.success_url, &urls.cancel_url).await?;
//! // Redirect user to session.checkout_url
//! ```

pub mod error;
pub mod order;
pub mod pricing;
pub mod product;
pub mod shipping;
pub mod size;
pub mod strategy;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use order::{CartLine, CheckoutSession, LineItem, LineKind, Order, OrderTotals, Quantity};
pub use pricing::PricingEngine;
pub use product::{Currency, Price, Product, ProductCatalog};
pub use shipping::{ShippingBracket, ShippingPolicy};
pub use size::{parse_size_to_liters, parse_size_to_milliliters};
pub use strategy::{BoxedPaymentStrategy, CheckoutUrls, PaymentStrategy};
