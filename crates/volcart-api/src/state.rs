//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the pricing engine, the payment strategy and process configuration.

use crate::cors::CorsPolicy;
use anyhow::Context;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use volcart_core::{BoxedPaymentStrategy, CheckoutUrls, PricingEngine};
use volcart_stripe::StripeCheckoutStrategy;

/// Places searched for the catalog when `CATALOG_PATH` is not set
const CATALOG_SEARCH_PATHS: [&str; 3] = [
    "config/catalog.toml",
    "../config/catalog.toml",
    "../../config/catalog.toml",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// CORS allow-list; empty means any origin
    pub allowed_origins: Vec<String>,
    /// Explicit catalog file
    pub catalog_path: Option<PathBuf>,
    /// Fallback success/cancel URLs
    pub urls: CheckoutUrls,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = CheckoutUrls::default();

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|raw| CorsPolicy::parse_allow_list(&raw))
                .unwrap_or_default(),
            catalog_path: lookup("CATALOG_PATH").map(PathBuf::from),
            urls: CheckoutUrls::new(
                lookup("DEFAULT_SUCCESS_URL").unwrap_or(defaults.success_url),
                lookup("DEFAULT_CANCEL_URL").unwrap_or(defaults.cancel_url),
            ),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Catalog and shipping table
    pub engine: Arc<PricingEngine>,
    /// Payment provider
    pub strategy: BoxedPaymentStrategy,
    /// CORS allow-list
    pub cors: Arc<CorsPolicy>,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState with the Stripe strategy
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let engine = load_pricing_engine(config.catalog_path.as_deref())?;

        let stripe_strategy = StripeCheckoutStrategy::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::from_parts(config, engine, Arc::new(stripe_strategy)))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        config: AppConfig,
        engine: PricingEngine,
        strategy: BoxedPaymentStrategy,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            strategy,
            cors: Arc::new(CorsPolicy::new(config.allowed_origins.clone())),
            config: Arc::new(config),
        }
    }
}

/// Load catalog and shipping table.
///
/// An explicit path must exist. Without one the search paths are tried and an
/// empty catalog with the default shipping table is used as a last resort.
pub fn load_pricing_engine(explicit: Option<&Path>) -> anyhow::Result<PricingEngine> {
    if let Some(path) = explicit {
        return read_pricing_engine(path);
    }

    for path in CATALOG_SEARCH_PATHS.iter().map(Path::new) {
        if path.exists() {
            return read_pricing_engine(path);
        }
    }

    tracing::warn!("No catalog found, using empty catalog");
    Ok(PricingEngine::default())
}

fn read_pricing_engine(path: &Path) -> anyhow::Result<PricingEngine> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let engine = PricingEngine::from_toml(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
    tracing::info!(
        "Loaded {} products from {}",
        engine.catalog().len(),
        path.display()
    );
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.urls, CheckoutUrls::default());
        assert!(!config.is_production());
    }

    #[test]
    fn test_app_config_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PORT", "3000"),
            ("ENVIRONMENT", "production"),
            ("ALLOWED_ORIGINS", "https://shop.example, https://www.shop.example ,"),
            ("DEFAULT_SUCCESS_URL", "https://shop.example/merci"),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.port, 3000);
        assert!(config.is_production());
        assert_eq!(
            config.allowed_origins,
            vec!["https://shop.example", "https://www.shop.example"]
        );
        assert_eq!(config.urls.success_url, "https://shop.example/merci");
        assert_eq!(config.urls.cancel_url, "https://example.com/cancel");
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_load_pricing_engine_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[products]]
id = "test-1"
name = "Produit Test"
price = 10.0
"#
        )
        .unwrap();

        let engine = load_pricing_engine(Some(file.path())).unwrap();
        assert_eq!(engine.catalog().len(), 1);
    }

    #[test]
    fn test_missing_explicit_catalog_is_an_error() {
        let result = load_pricing_engine(Some(Path::new("/nonexistent/catalog.toml")));
        assert!(result.is_err());
    }
}
