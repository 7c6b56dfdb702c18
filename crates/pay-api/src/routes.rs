//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - API:
///   - POST /api/v1/checkout - Start express checkout, returns approval URL
///   - POST /api/v1/checkout/confirm - Capture an approved checkout
///   - GET  /api/v1/products - List active products
///   - GET  /api/v1/products/{id} - Get product by ID
///
/// - Landing pages:
///   - GET /checkout/success - Return URL (token, PayerID)
///   - GET /checkout/cancel - Cancel URL
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .merge(api_routes())
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    let checkout_pages = Router::new()
        .route("/success", get(handlers::checkout_success))
        .route("/cancel", get(handlers::checkout_cancel));

    let api = Router::new()
        .route("/checkout", post(handlers::create_checkout))
        .route("/checkout/confirm", post(handlers::confirm_checkout))
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product));

    Router::new()
        .nest("/checkout", checkout_pages)
        .nest("/api/v1", api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use pay_core::{Decimal, PaymentResult, Product, ProductCatalog};
    use pay_paypal::{HttpReply, PayPalClient, PayPalConfig, Transport};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Answers each NVP method with a canned body and records the forms
    #[derive(Default)]
    struct StubTransport {
        replies: Vec<(&'static str, &'static str)>,
        forms: Mutex<Vec<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn post_form(
            &self,
            _url: &str,
            form: &[(String, String)],
        ) -> PaymentResult<HttpReply> {
            self.forms.lock().unwrap().push(form.to_vec());
            let method = form
                .iter()
                .find(|(k, _)| k == "METHOD")
                .map(|(_, v)| v.as_str())
                .unwrap_or_default();
            let body = self
                .replies
                .iter()
                .find(|(m, _)| *m == method)
                .map(|(_, body)| body.to_string())
                .unwrap_or_default();
            Ok(HttpReply { status: 200, body })
        }
    }

    fn catalog() -> ProductCatalog {
        let mut catalog = ProductCatalog::new();
        catalog.add(Product::digital("ebook", "Rust E-book", Decimal::new(1999, 2)));
        catalog.add(Product::digital("wallpaper", "Wallpaper Pack", Decimal::new(150, 2)));
        catalog.add(Product::digital("retired", "Old Course", Decimal::new(5, 0)).inactive());
        catalog
    }

    fn server(transport: Arc<StubTransport>) -> TestServer {
        let client =
            PayPalClient::with_transport(PayPalConfig::new("user", "pwd", "sig", true), transport);
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: "https://shop.example".to_string(),
            environment: "test".to_string(),
            currency: "USD".to_string(),
        };
        let state = AppState::with_parts(client, catalog(), config);
        TestServer::new(create_router(state)).unwrap()
    }

    fn value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[tokio::test]
    async fn test_health() {
        let server = server(Arc::new(StubTransport::default()));
        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["sandbox"], true);
    }

    #[tokio::test]
    async fn test_list_products_hides_inactive() {
        let server = server(Arc::new(StubTransport::default()));
        let body: Value = server.get("/api/v1/products").await.json();

        assert_eq!(body["count"], 2);
        let missing = server.get("/api/v1/products/nope").await;
        missing.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_checkout() {
        let transport = Arc::new(StubTransport {
            replies: vec![(
                "SetExpressCheckout",
                "TOKEN=EC%2d8MX09937UL3285345&CORRELATIONID=c1&ACK=Success&VERSION=84",
            )],
            ..Default::default()
        });
        let server = server(transport.clone());

        let response = server
            .post("/api/v1/checkout")
            .json(&json!({
                "items": [
                    { "product_id": "ebook", "quantity": 2 },
                    { "product_id": "wallpaper" }
                ]
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["token"], "EC-8MX09937UL3285345");
        assert_eq!(body["amount"], "41.48");
        assert_eq!(body["correlation_id"], "c1");
        assert_eq!(
            body["redirect_url"],
            "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_express-checkout&token=EC-8MX09937UL3285345"
        );

        let forms = transport.forms.lock().unwrap();
        let form = &forms[0];
        assert_eq!(value(form, "PAYMENTREQUEST_0_AMT"), Some("41.48"));
        assert_eq!(value(form, "L_PAYMENTREQUEST_0_NAME0"), Some("Rust E-book"));
        assert_eq!(value(form, "L_PAYMENTREQUEST_0_QTY0"), Some("2"));
        assert_eq!(value(form, "L_PAYMENTREQUEST_0_NAME1"), Some("Wallpaper Pack"));
        assert_eq!(value(form, "L_PAYMENTREQUEST_0_AMT1"), Some("1.50"));
        assert_eq!(
            value(form, "RETURNURL"),
            Some("https://shop.example/checkout/success")
        );
    }

    #[tokio::test]
    async fn test_create_checkout_rejections() {
        let server = server(Arc::new(StubTransport::default()));

        server
            .post("/api/v1/checkout")
            .json(&json!({}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/v1/checkout")
            .json(&json!({ "product_id": "retired" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/v1/checkout")
            .json(&json!({ "product_id": "missing" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_confirm_checkout() {
        let transport = Arc::new(StubTransport {
            replies: vec![(
                "DoExpressCheckoutPayment",
                "ACK=Success&CORRELATIONID=c2&PAYMENTINFO_0_TRANSACTIONID=8SC56973LM923823H\
                 &PAYMENTINFO_0_PAYMENTSTATUS=Completed",
            )],
            ..Default::default()
        });
        let server = server(transport.clone());

        let response = server
            .post("/api/v1/checkout/confirm")
            .json(&json!({
                "token": "EC-8MX09937UL3285345",
                "payer_id": "95HR9CM6D56Q2",
                "amount": "41.48"
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "Success");
        assert_eq!(body["transaction_id"], "8SC56973LM923823H");
        assert_eq!(body["payment_status"], "Completed");

        let forms = transport.forms.lock().unwrap();
        assert_eq!(value(&forms[0], "PAYERID"), Some("95HR9CM6D56Q2"));
        assert_eq!(value(&forms[0], "PAYMENTREQUEST_0_PAYMENTACTION"), Some("Sale"));
        assert_eq!(value(&forms[0], "PAYMENTREQUEST_0_CURRENCYCODE"), Some("USD"));
    }

    #[tokio::test]
    async fn test_confirm_checkout_provider_failure() {
        let transport = Arc::new(StubTransport {
            replies: vec![(
                "DoExpressCheckoutPayment",
                "ACK=Failure&CORRELATIONID=c3&L_ERRORCODE0=10486\
                 &L_SHORTMESSAGE0=This+transaction+couldn%27t+be+completed.\
                 &L_LONGMESSAGE0=Redirect+the+buyer+to+PayPal.&L_SEVERITYCODE0=Error",
            )],
            ..Default::default()
        });
        let server = server(transport);

        let response = server
            .post("/api/v1/checkout/confirm")
            .json(&json!({
                "token": "EC-1",
                "payer_id": "P1",
                "amount": "10.00"
            }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(
            body["error"],
            "Provider Error 10486: This transaction couldn't be completed."
        );
        assert_eq!(body["details"], "Redirect the buyer to PayPal.");
        assert_eq!(body["correlation_id"], "c3");
    }

    #[tokio::test]
    async fn test_confirm_checkout_rejects_non_nvp_body() {
        let transport = Arc::new(StubTransport {
            replies: vec![(
                "DoExpressCheckoutPayment",
                "<html><body>Service Unavailable</body></html>",
            )],
            ..Default::default()
        });
        let server = server(transport);

        let response = server
            .post("/api/v1/checkout/confirm")
            .json(&json!({
                "token": "EC-1",
                "payer_id": "P1",
                "amount": "10.00"
            }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["code"], 502);
        assert!(body.get("status").is_none());
    }

    #[tokio::test]
    async fn test_success_page_escapes_query() {
        let server = server(Arc::new(StubTransport::default()));
        let response = server
            .get("/checkout/success")
            .add_query_param("token", "<b>EC-1</b>")
            .add_query_param("PayerID", "P1")
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("&lt;b&gt;EC-1&lt;/b&gt;"));
        assert!(html.contains("P1"));
    }
}
