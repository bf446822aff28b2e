//! # Payment Error Types
//!
//! Typed error handling for the volcart checkout engine.
//! All pricing and checkout operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all pricing and checkout operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid catalog or shipping table)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The submitted cart has no lines
    #[error("Cart is empty")]
    EmptyCart,

    /// Product not found in catalog
    #[error("Unknown product id: {product_id}")]
    ProductNotFound { product_id: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Checkout session creation failed
    #[error("Checkout creation failed: {0}")]
    CheckoutCreationFailed(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::EmptyCart => 400,
            PaymentError::ProductNotFound { .. } => 400,
            PaymentError::Configuration(_)
            | PaymentError::ProviderError { .. }
            | PaymentError::NetworkError(_)
            | PaymentError::CheckoutCreationFailed(_)
            | PaymentError::Serialization(_) => 500,
        }
    }

    /// Returns true if this error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Message safe to hand back to the caller.
    ///
    /// Server-side failures collapse to a generic message; the detail is only
    /// available through `Display` for logging.
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            "Server error".to_string()
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PaymentError::EmptyCart.status_code(), 400);
        assert_eq!(
            PaymentError::ProductNotFound {
                product_id: "x".into()
            }
            .status_code(),
            400
        );
        assert_eq!(
            PaymentError::NetworkError("timeout".into()).status_code(),
            500
        );
        assert_eq!(
            PaymentError::ProviderError {
                provider: "stripe".into(),
                message: "card declined".into()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_public_messages() {
        assert_eq!(PaymentError::EmptyCart.public_message(), "Cart is empty");
        assert_eq!(
            PaymentError::ProductNotFound {
                product_id: "gs-1l".into()
            }
            .public_message(),
            "Unknown product id: gs-1l"
        );
        assert_eq!(
            PaymentError::ProviderError {
                provider: "stripe".into(),
                message: "Invalid API Key provided".into()
            }
            .public_message(),
            "Server error"
        );
    }
}
