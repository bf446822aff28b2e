use async_trait::async_trait;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use volcart_api::{create_router, AppConfig, AppState};
use volcart_core::{
    CheckoutSession, LineKind, Order, PaymentError, PaymentResult, PaymentStrategy,
    PricingEngine, ProductCatalog, ShippingPolicy,
};

const CHECKOUT: &str = "/api/create-checkout-session";

/// Records every order it is asked to check out
#[derive(Default)]
struct FakeStrategy {
    calls: Mutex<Vec<(Order, String, String)>>,
    fail: bool,
}

impl FakeStrategy {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(Order, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentStrategy for FakeStrategy {
    async fn create_checkout(
        &self,
        order: &Order,
        success_url: &str,
        cancel_url: &str,
    ) -> PaymentResult<CheckoutSession> {
        self.calls.lock().unwrap().push((
            order.clone(),
            success_url.to_string(),
            cancel_url.to_string(),
        ));
        if self.fail {
            return Err(PaymentError::NetworkError("connection reset".into()));
        }
        Ok(CheckoutSession::new(
            "cs_test_1",
            &order.id,
            "fake",
            "https://checkout.example/cs_test_1",
        ))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

fn engine() -> PricingEngine {
    let catalog = ProductCatalog::default()
        .with_product("gs-1l", "Green Star", 14.90)
        .and_then(|c| c.with_product("test-1", "Produit Test", 10.00))
        .unwrap();
    PricingEngine::new(catalog, ShippingPolicy::default())
}

fn server_with(config: AppConfig, strategy: Arc<FakeStrategy>) -> TestServer {
    let state = AppState::from_parts(config, engine(), strategy);
    TestServer::new(create_router(state)).unwrap()
}

fn server(strategy: Arc<FakeStrategy>) -> TestServer {
    server_with(AppConfig::default(), strategy)
}

fn header_str<'a>(response: &'a axum_test::TestResponse, name: header::HeaderName) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_checkout_returns_provider_url() {
    let strategy = Arc::new(FakeStrategy::default());
    let server = server(strategy.clone());

    let response = server
        .post(CHECKOUT)
        .json(&json!({
            "items": [
                {"id": "gs-1l", "qty": 2, "size": "1L"},
                {"id": "test-1", "qty": 1, "size": "500ml"}
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({"url": "https://checkout.example/cs_test_1"}));

    let calls = strategy.calls();
    assert_eq!(calls.len(), 1);
    let (order, success_url, cancel_url) = &calls[0];

    assert_eq!(order.line_items.len(), 3);
    assert_eq!(order.line_items[0].name, "Green Star - 1L");
    assert_eq!(order.line_items[0].unit_price.amount, 1490);
    assert_eq!(order.line_items[0].quantity, 2);
    assert_eq!(order.totals.subtotal.amount, 3980);
    assert_eq!(order.totals.volume_ml, 2500);

    let shipping = &order.line_items[2];
    assert_eq!(shipping.kind, LineKind::Shipping);
    assert_eq!(shipping.unit_price.amount, 990);

    assert_eq!(success_url, "https://example.com/success");
    assert_eq!(cancel_url, "https://example.com/cancel");
}

#[tokio::test]
async fn test_request_urls_override_defaults() {
    let strategy = Arc::new(FakeStrategy::default());
    let server = server(strategy.clone());

    server
        .post(CHECKOUT)
        .json(&json!({
            "items": [{"id": "test-1"}],
            "success_url": "https://shop.example/merci",
            "cancel_url": "https://shop.example/panier"
        }))
        .await;

    let calls = strategy.calls();
    assert_eq!(calls[0].1, "https://shop.example/merci");
    assert_eq!(calls[0].2, "https://shop.example/panier");
}

#[tokio::test]
async fn test_empty_cart_is_rejected() {
    let strategy = Arc::new(FakeStrategy::default());
    let server = server(strategy.clone());

    for body in [json!({"items": []}), json!({})] {
        let response = server.post(CHECKOUT).json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>(), json!({"error": "Cart is empty"}));
    }

    assert!(strategy.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_product_rejects_whole_cart() {
    let strategy = Arc::new(FakeStrategy::default());
    let server = server(strategy.clone());

    let response = server
        .post(CHECKOUT)
        .json(&json!({
            "items": [
                {"id": "gs-1l", "qty": 1, "size": "1L"},
                {"id": "ghost", "qty": 1}
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Unknown product id: ghost"})
    );
    assert!(strategy.calls().is_empty());
}

#[tokio::test]
async fn test_numeric_id_is_invalid_body() {
    let strategy = Arc::new(FakeStrategy::default());
    let server = server(strategy.clone());

    let response = server
        .post(CHECKOUT)
        .json(&json!({"items": [{"id": 1.0, "qty": 1}]}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Invalid request body"})
    );
    assert!(strategy.calls().is_empty());
}

#[tokio::test]
async fn test_missing_id_is_unknown_product() {
    let strategy = Arc::new(FakeStrategy::default());
    let server = server(strategy.clone());

    let response = server
        .post(CHECKOUT)
        .json(&json!({"items": [{"qty": 1, "size": "1L"}]}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Unknown product id: "})
    );
    assert!(strategy.calls().is_empty());
}

#[tokio::test]
async fn test_quantities_are_clamped() {
    let strategy = Arc::new(FakeStrategy::default());
    let server = server(strategy.clone());

    server
        .post(CHECKOUT)
        .json(&json!({
            "items": [
                {"id": "test-1", "qty": 150},
                {"id": "test-1", "qty": 0},
                {"id": "test-1", "qty": -3},
                {"id": "test-1", "qty": "abc"}
            ]
        }))
        .await;

    let calls = strategy.calls();
    let quantities: Vec<u32> = calls[0]
        .0
        .line_items
        .iter()
        .filter(|i| i.kind == LineKind::Product)
        .map(|i| i.quantity)
        .collect();
    assert_eq!(quantities, vec![99, 1, 1, 1]);
    assert_eq!(calls[0].0.totals.subtotal.amount, 102 * 1000);
}

#[tokio::test]
async fn test_provider_failure_is_generic_server_error() {
    let strategy = Arc::new(FakeStrategy::failing());
    let server = server(strategy.clone());

    let response = server
        .post(CHECKOUT)
        .json(&json!({"items": [{"id": "test-1", "qty": 1}]}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({"error": "Server error"}));
    assert_eq!(strategy.calls().len(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = server(Arc::new(FakeStrategy::default()));

    let response = server.post(CHECKOUT).text("{not json").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Invalid request body"})
    );
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let server = server(Arc::new(FakeStrategy::default()));

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let response = server.method(method, CHECKOUT).await;
        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": "Method not allowed"})
        );
    }
}

#[tokio::test]
async fn test_preflight_without_allow_list() {
    let server = server(Arc::new(FakeStrategy::default()));

    let response = server
        .method(Method::OPTIONS, CHECKOUT)
        .add_header(header::ORIGIN, HeaderValue::from_static("https://any.example"))
        .await;

    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(
        header_str(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some("*")
    );
    assert_eq!(
        header_str(&response, header::ACCESS_CONTROL_ALLOW_METHODS),
        Some("POST, OPTIONS")
    );
    assert_eq!(
        header_str(&response, header::ACCESS_CONTROL_ALLOW_HEADERS),
        Some("Content-Type")
    );
}

#[tokio::test]
async fn test_allow_list_origin_negotiation() {
    let config = AppConfig {
        allowed_origins: vec![
            "https://shop.example".to_string(),
            "https://www.shop.example".to_string(),
        ],
        ..AppConfig::default()
    };
    let server = server_with(config, Arc::new(FakeStrategy::default()));

    let listed = server
        .post(CHECKOUT)
        .add_header(header::ORIGIN, HeaderValue::from_static("https://www.shop.example"))
        .json(&json!({"items": []}))
        .await;
    assert_eq!(
        header_str(&listed, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some("https://www.shop.example")
    );

    let unlisted = server
        .method(Method::OPTIONS, CHECKOUT)
        .add_header(header::ORIGIN, HeaderValue::from_static("https://evil.example"))
        .await;
    assert_eq!(
        header_str(&unlisted, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some("https://shop.example")
    );
}

#[tokio::test]
async fn test_health() {
    let server = server(Arc::new(FakeStrategy::default()));

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "volcart");
}
