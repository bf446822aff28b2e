//! # volcart-stripe
//!
//! Stripe Checkout strategy for volcart.
//!
//! Posts a priced order (product lines plus the shipping line) to the
//! Checkout Sessions API and hands back the hosted payment page URL.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use volcart_stripe::StripeCheckoutStrategy;
//! use volcart_core::PaymentStrategy;
//!
//! // Create strategy from environment
//! let strategy = StripeCheckoutStrategy::from_env()?;
//!
//! // Create checkout session
//! let session = strategy.create_checkout(
//!     &order,
//!     "https://example.com/success",
//!     "https://example.com/cancel",
//! ).await?;
//!
//! // Redirect user to session.checkout_url
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
