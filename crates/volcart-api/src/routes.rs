//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::cors;
use crate::handlers;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub const CHECKOUT_PATH: &str = "/api/create-checkout-session";

/// Create the main application router
///
/// Routes:
///   - POST    /api/create-checkout-session - Price cart, open checkout
///   - OPTIONS /api/create-checkout-session - CORS preflight (204)
///   - any other method on it               - 405
///   - GET     /health                      - Health check
pub fn create_router(state: AppState) -> Router {
    let checkout = post(handlers::create_checkout_session)
        .options(handlers::preflight)
        .fallback(handlers::method_not_allowed);

    Router::new()
        .route("/health", get(handlers::health))
        .route(CHECKOUT_PATH, checkout)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.cors.clone(),
                    cors::apply_cors,
                )),
        )
        .with_state(state)
}
