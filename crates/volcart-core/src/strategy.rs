//! # Payment Strategy Trait
//!
//! The seam between pricing and the hosted payment page. The checkout
//! service only ever talks to a `PaymentStrategy`; Stripe is one
//! implementation, tests plug in their own.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentStrategy (trait)                  │
//! │  ├── create_checkout()                                      │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │StripeCheckout │
//!                    │   Strategy    │
//!                    └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::order::{CheckoutSession, Order};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a checkout session and return the redirect URL.
    ///
    /// # Arguments
    /// * `order` - The priced order, shipping line included
    /// * `success_url` - URL to redirect after successful payment
    /// * `cancel_url` - URL to redirect if customer cancels
    async fn create_checkout(
        &self,
        order: &Order,
        success_url: &str,
        cancel_url: &str,
    ) -> PaymentResult<CheckoutSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Redirect targets handed to the payment page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutUrls {
    pub fn new(success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        Self {
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }

    /// Per-request URLs win over the configured ones; blank values are ignored.
    pub fn resolve(&self, success_url: Option<&str>, cancel_url: Option<&str>) -> Self {
        let pick = |requested: Option<&str>, fallback: &str| {
            requested
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        Self {
            success_url: pick(success_url, &self.success_url),
            cancel_url: pick(cancel_url, &self.cancel_url),
        }
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("https://example.com/success", "https://example.com/cancel")
    }
}
