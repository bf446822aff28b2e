//! # volcart
//!
//! Checkout service: prices a cart, adds shipping, opens a Stripe Checkout
//! session.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export ALLOWED_ORIGINS=https://shop.example
//!
//! # Run the server
//! volcart
//! ```

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use volcart_api::{routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Catalog: {} products ({})",
        state.engine.catalog().len(),
        state.engine.catalog().currency
    );
    info!(
        "Free shipping from {}",
        state
            .engine
            .shipping()
            .free_from_price(state.engine.catalog().currency)
            .display()
    );
    info!("Payment provider: {}", state.strategy.provider_name());
    if state.config.allowed_origins.is_empty() {
        info!("CORS: any origin");
    } else {
        info!("CORS: {:?}", state.config.allowed_origins);
    }

    let app = routes::create_router(state);

    info!("volcart starting on http://{}", addr);
    if !is_prod {
        info!("Checkout: POST http://{}{}", addr, routes::CHECKOUT_PATH);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filters, `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    let registry = tracing_subscriber::registry().with(filter);

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
