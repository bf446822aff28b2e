//! # volcart-api
//!
//! HTTP API layer for volcart.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The checkout endpoint with allow-list CORS
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/create-checkout-session` | Price cart, return checkout URL |
//! | OPTIONS | `/api/create-checkout-session` | CORS preflight |

pub mod cors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
