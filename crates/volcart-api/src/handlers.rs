//! # Request Handlers
//!
//! Axum request handlers for the checkout API.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use volcart_core::{CartLine, PaymentError, Quantity};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout request
#[derive(Debug, Default, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Items to purchase
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    /// Override for the success redirect
    #[serde(default)]
    pub success_url: Option<String>,
    /// Override for the cancel redirect
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// Item in checkout request.
///
/// `id` must be a JSON string; a missing id is looked up as the empty id and
/// fails as an unknown product. `qty` and `size` are as loosely typed as shop
/// fronts send them.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutItem {
    /// Product ID
    #[serde(default)]
    pub id: Option<String>,
    /// Quantity, number or numeric string
    #[serde(default)]
    pub qty: Option<serde_json::Value>,
    /// Size descriptor
    #[serde(default)]
    pub size: Option<serde_json::Value>,
}

impl CheckoutItem {
    pub fn to_cart_line(&self) -> CartLine {
        let id = self.id.clone().unwrap_or_default();
        let line = CartLine::new(id, Quantity::from_json(self.qty.as_ref()));
        match json_text(self.size.as_ref()) {
            Some(size) => line.with_size(size),
            None => line,
        }
    }
}

/// Strings as-is, numbers in their JSON spelling, nothing else
fn json_text(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Create checkout response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCheckoutResponse {
    /// Checkout URL (redirect user here)
    pub url: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.public_message())))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "volcart",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Price the cart and open a hosted checkout session
#[instrument(skip(state, payload))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateCheckoutRequest>, JsonRejection>,
) -> Result<Json<CreateCheckoutResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected checkout body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid request body")),
        )
    })?;

    let lines: Vec<CartLine> = request.items.iter().map(CheckoutItem::to_cart_line).collect();

    let order = state.engine.quote(&lines).map_err(|e| {
        info!("Cart rejected: {}", e);
        payment_error_to_response(e)
    })?;

    let urls = state
        .config
        .urls
        .resolve(request.success_url.as_deref(), request.cancel_url.as_deref());

    info!(
        "Creating checkout: order={}, {} items, subtotal={}, volume={}L, shipping={}",
        order.id,
        order.item_count(),
        order.totals.subtotal.display(),
        order.totals.volume_liters(),
        order.totals.shipping.display()
    );

    let session = state
        .strategy
        .create_checkout(&order, &urls.success_url, &urls.cancel_url)
        .await
        .map_err(|e| {
            error!(
                "Failed to create checkout with {}: {}",
                state.strategy.provider_name(),
                e
            );
            payment_error_to_response(e)
        })?;

    info!("Created checkout session: {}", session.session_id);

    Ok(Json(CreateCheckoutResponse {
        url: session.checkout_url,
    }))
}

/// CORS preflight
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any method other than POST and OPTIONS
pub async fn method_not_allowed() -> ApiError {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}
