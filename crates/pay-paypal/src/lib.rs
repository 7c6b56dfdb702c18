//! # pay-paypal
//!
//! PayPal NVP client for digital-goods express checkout.
//!
//! Two operations are exposed, both funnelled through
//! [`PayPalClient::execute`]:
//!
//! 1. **SetExpressCheckout** - start a checkout and obtain a `TOKEN`
//! 2. **DoExpressCheckoutPayment** - capture the approved payment
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_paypal::{PayPalClient, PAYMENT_ACTION_SALE};
//! use pay_core::{Decimal, LineItem};
//!
//! // Create client from environment
//! let client = PayPalClient::from_env()?;
//!
//! let items = vec![LineItem::new("Album", Decimal::new(999, 2), 1)];
//! let response = client
//!     .set_express_checkout_digital_goods(
//!         Decimal::new(999, 2),
//!         "USD",
//!         "https://example.com/return",
//!         "https://example.com/cancel",
//!         &items,
//!     )
//!     .await?;
//!
//! // Redirect the buyer to approve the payment
//! let token = response.token().unwrap_or_default();
//! let url = client.config().checkout_redirect_url(token);
//!
//! // Back on the return URL, with `token` and `PayerID`:
//! client
//!     .confirm_express_checkout_payment(
//!         token,
//!         payer_id,
//!         PAYMENT_ACTION_SALE,
//!         "USD",
//!         Decimal::new(999, 2),
//!     )
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod express;
pub mod transport;

// Re-exports
pub use client::{PayPalClient, BUILD_KEY};
pub use config::{PayPalConfig, API_VERSION, PRODUCTION_ENDPOINT, SANDBOX_ENDPOINT};
pub use decode::{decode_body, DecodeError};
pub use express::{
    build_confirm_express_checkout, build_set_express_checkout, DoExpressCheckoutPayment,
    NvpRequest, SetExpressCheckout, PAYMENT_ACTION_SALE,
};
pub use transport::{HttpReply, ReqwestTransport, Transport};
