//! # CORS
//!
//! Allow-list based origin negotiation. The shop front posts from a page
//! builder domain, so the response must name one concrete origin when an
//! allow-list is configured.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Origins allowed to call the checkout endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    /// Split a comma-separated allow-list, dropping blanks
    pub fn parse_allow_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Value for `Access-Control-Allow-Origin`.
    ///
    /// No allow-list: `*`. Listed origin: echoed back. Anything else gets the
    /// first listed origin, which the browser will then refuse.
    pub fn allow_origin(&self, origin: Option<&str>) -> &str {
        let Some(first) = self.allowed_origins.first() else {
            return "*";
        };

        origin
            .and_then(|o| self.allowed_origins.iter().find(|allowed| *allowed == o))
            .unwrap_or(first)
    }
}

/// Middleware stamping CORS headers on every response
pub async fn apply_cors(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(policy.allow_origin(origin.as_deref())) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );

    response
}
