//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API.
//! Every priced line, shipping included, is sent as inline `price_data`.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use volcart_core::{CheckoutSession, Order, PaymentError, PaymentResult, PaymentStrategy};

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page for card payments.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!("Stripe checkout in {} mode", config.mode());

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    /// Form fields for `POST /v1/checkout/sessions`
    fn form_params(order: &Order, success_url: &str, cancel_url: &str) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
        ];

        for (i, item) in order.line_items.iter().enumerate() {
            form_params.push((
                format!("line_items[{}][price_data][currency]", i),
                item.unit_price.currency.as_str().to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_price.amount.to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params.push(("metadata[order_id]".to_string(), order.id.clone()));
        form_params
    }
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn create_checkout(
        &self,
        order: &Order,
        success_url: &str,
        cancel_url: &str,
    ) -> PaymentResult<CheckoutSession> {
        if order.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "Order has no items".to_string(),
            ));
        }

        let form_params = Self::form_params(order, success_url, cancel_url);
        debug!(
            "Creating Stripe checkout session: {} line items, total={}",
            order.line_items.len(),
            order.total().display()
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session_response: StripeCheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| {
                PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
            })?;

        let checkout_url = session_response.url.ok_or_else(|| {
            PaymentError::CheckoutCreationFailed(format!(
                "Stripe session {} has no url",
                session_response.id
            ))
        })?;

        info!(
            "Created Stripe checkout session: id={}, url={}",
            session_response.id, checkout_url
        );

        Ok(CheckoutSession {
            session_id: session_response.id,
            order_id: order.id.clone(),
            provider: PROVIDER.to_string(),
            checkout_url,
            expires_at: session_response
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            created_at: Utc::now(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
