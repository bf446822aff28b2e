//! # Stripe Configuration
//!
//! Configuration management for Stripe integration.
//! The secret key is loaded from the environment.

use std::env;
use volcart_core::PaymentError;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    ///
    /// Optional:
    /// - `STRIPE_API_BASE` (defaults to `https://api.stripe.com`)
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret_key = env::var("STRIPE_SECRET_KEY").map_err(|_| {
            PaymentError::Configuration("STRIPE_SECRET_KEY not set".to_string())
        })?;

        let config = Self::new(secret_key).validate()?;

        Ok(match env::var("STRIPE_API_BASE") {
            Ok(base) if !base.trim().is_empty() => config.with_api_base_url(base.trim()),
            _ => config,
        })
    }

    /// Create config with an explicit key (for testing)
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Reject keys that are not Stripe secret keys
    pub fn validate(self) -> Result<Self, PaymentError> {
        if !self.secret_key.starts_with("sk_test_") && !self.secret_key.starts_with("sk_live_") {
            return Err(PaymentError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
            ));
        }
        Ok(self)
    }

    /// `"live"` for live keys, `"test"` otherwise
    pub fn mode(&self) -> &'static str {
        if self.secret_key.starts_with("sk_live_") {
            "live"
        } else {
            "test"
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}
