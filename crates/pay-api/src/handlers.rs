//! # Request Handlers
//!
//! Axum request handlers for the express-checkout flow.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use pay_core::{order_total, Decimal, LineItem, PaymentError};
use pay_paypal::PAYMENT_ACTION_SALE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout request
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Items to purchase
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    /// Convenience: single product_id (alternative to items array for single-product checkout)
    #[serde(default)]
    pub product_id: Option<String>,
}

/// Item in checkout request
#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    /// Product ID
    pub product_id: String,
    /// Quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Create checkout response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCheckoutResponse {
    /// Checkout token
    pub token: String,
    /// Approval URL (redirect user here)
    pub redirect_url: String,
    /// Order total sent to the provider
    pub amount: String,
    pub currency: String,
    pub correlation_id: String,
}

/// Confirm (capture) request, sent once the buyer is back on the return URL
#[derive(Debug, Deserialize)]
pub struct ConfirmCheckoutRequest {
    pub token: String,
    pub payer_id: String,
    /// Final amount, e.g. `"9.99"`
    pub amount: Decimal,
    /// Defaults to the service currency
    #[serde(default)]
    pub currency: Option<String>,
    /// Defaults to `Sale`
    #[serde(default)]
    pub payment_action: Option<String>,
}

/// Confirm response
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmCheckoutResponse {
    pub status: String,
    pub correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
            correlation_id: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);

    if let Some(detail) = err.failure_detail() {
        if !detail.long_message.is_empty() {
            response = response.with_details(detail.long_message.clone());
        }
    }
    if let Some(nvp) = err.response() {
        if !nvp.correlation_id.is_empty() {
            response.correlation_id = Some(nvp.correlation_id.clone());
        }
    }

    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(message, 400)),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "nvp-checkout",
        "version": env!("CARGO_PKG_VERSION"),
        "sandbox": state.client.config().use_sandbox,
    }))
}

/// Start an express checkout for catalog products
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<Json<CreateCheckoutResponse>, ApiError> {
    // Support single product_id as shorthand for items array
    let items = if !request.items.is_empty() {
        request.items
    } else if let Some(pid) = request.product_id {
        vec![CheckoutItem {
            product_id: pid,
            quantity: 1,
        }]
    } else {
        return Err(bad_request(
            "No items in checkout request (provide 'items' array or 'product_id')",
        ));
    };

    let mut line_items = Vec::with_capacity(items.len());
    for item in &items {
        let product = state.catalog.get(&item.product_id).ok_or_else(|| {
            payment_error_to_response(PaymentError::ProductNotFound {
                product_id: item.product_id.clone(),
            })
        })?;

        if !product.active {
            return Err(bad_request(format!(
                "Product is not available: {}",
                item.product_id
            )));
        }
        if item.quantity == 0 {
            return Err(bad_request(format!(
                "Quantity must be at least 1: {}",
                item.product_id
            )));
        }

        line_items.push(LineItem::from_product(product, item.quantity));
    }

    let amount = order_total(&line_items);
    let currency = state.config.currency.clone();

    info!(
        "Creating checkout: {} line items, total={} {}",
        line_items.len(),
        amount,
        currency
    );

    let response = state
        .client
        .set_express_checkout_digital_goods(
            amount,
            &currency,
            &state.return_url(),
            &state.cancel_url(),
            &line_items,
        )
        .await
        .map_err(|e| {
            error!("Failed to create checkout: {}", e);
            payment_error_to_response(e)
        })?;

    let token = response.token().map(str::to_string).ok_or_else(|| {
        error!(
            "SetExpressCheckout succeeded without a token: correlation_id={}",
            response.correlation_id
        );
        payment_error_to_response(PaymentError::Decode(
            "TOKEN missing from SetExpressCheckout response".to_string(),
        ))
    })?;

    info!("Created checkout token: {}", token);

    Ok(Json(CreateCheckoutResponse {
        redirect_url: state.client.config().checkout_redirect_url(&token),
        token,
        amount: pay_core::format_amount(amount),
        currency,
        correlation_id: response.correlation_id,
    }))
}

/// Capture an approved checkout
#[instrument(skip(state, request), fields(token = %request.token))]
pub async fn confirm_checkout(
    State(state): State<AppState>,
    Json(request): Json<ConfirmCheckoutRequest>,
) -> Result<Json<ConfirmCheckoutResponse>, ApiError> {
    if request.token.is_empty() || request.payer_id.is_empty() {
        return Err(bad_request("token and payer_id are required"));
    }

    let currency = request
        .currency
        .unwrap_or_else(|| state.config.currency.clone());
    let payment_action = request
        .payment_action
        .unwrap_or_else(|| PAYMENT_ACTION_SALE.to_string());

    let response = state
        .client
        .confirm_express_checkout_payment(
            &request.token,
            &request.payer_id,
            &payment_action,
            &currency,
            request.amount,
        )
        .await
        .map_err(|e| {
            error!("Failed to confirm checkout: {}", e);
            payment_error_to_response(e)
        })?;

    info!(
        "Confirmed checkout: ack={}, correlation_id={}",
        response.status, response.correlation_id
    );

    Ok(Json(ConfirmCheckoutResponse {
        transaction_id: response
            .get("PAYMENTINFO_0_TRANSACTIONID")
            .map(str::to_string),
        payment_status: response
            .get("PAYMENTINFO_0_PAYMENTSTATUS")
            .map(str::to_string),
        status: response.status,
        correlation_id: response.correlation_id,
    }))
}

/// Get products list
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let products: Vec<_> = state.catalog.active_products().collect();
    Json(serde_json::json!({
        "products": products,
        "count": products.len()
    }))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.catalog.get(&product_id).ok_or_else(|| {
        payment_error_to_response(PaymentError::ProductNotFound { product_id })
    })?;

    Ok(Json(product.clone()))
}

/// Return URL landing page; the provider appends `token` and `PayerID`
pub async fn checkout_success(
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let token = params.get("token").map(|s| s.as_str()).unwrap_or("unknown");
    let payer_id = params.get("PayerID").map(|s| s.as_str()).unwrap_or("unknown");
    Html(format!(r#"
<!DOCTYPE html>
<html>
<head><title>Payment Approved</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #f5f7fa;">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <h1>Payment Approved</h1>
        <p>Token: <code>{}</code></p>
        <p>Payer: <code>{}</code></p>
        <p style="color: #666;">Confirm the payment to complete your purchase.</p>
    </div>
</body>
</html>
"#, escape_html(token), escape_html(payer_id)))
}

/// Cancel URL landing page
pub async fn checkout_cancel() -> impl IntoResponse {
    Html(r#"
<!DOCTYPE html>
<html>
<head><title>Payment Cancelled</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #f5f7fa;">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <h1>Payment Cancelled</h1>
        <p style="color: #666;">No charges were made.</p>
    </div>
</body>
</html>
"#)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
