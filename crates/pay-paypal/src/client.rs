//! # PayPal NVP Client
//!
//! Every operation funnels through [`PayPalClient::execute`]: credentials and
//! version are appended, the form is posted to the sandbox or production
//! endpoint, the body is decoded and the result mapped to success or a
//! provider failure. Nothing is retried.

use crate::config::{PayPalConfig, API_VERSION};
use crate::decode::decode_body;
use crate::express::{DoExpressCheckoutPayment, NvpRequest, SetExpressCheckout};
use crate::transport::{ReqwestTransport, Transport};
use pay_core::{Decimal, LineItem, NvpResponse, PaymentError, PaymentResult, RequestFields};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Field holding the provider build id
#[cfg(feature = "legacy-build-key")]
pub const BUILD_KEY: &str = "2975009";

/// Field holding the provider build id
#[cfg(not(feature = "legacy-build-key"))]
pub const BUILD_KEY: &str = "BUILD";

/// PayPal NVP client
///
/// Holds an immutable config and a shared transport; safe to clone and use
/// from many tasks at once.
#[derive(Clone)]
pub struct PayPalClient {
    config: Arc<PayPalConfig>,
    transport: Arc<dyn Transport>,
}

impl PayPalClient {
    /// Create a client using the `reqwest` transport
    pub fn new(config: PayPalConfig) -> PaymentResult<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = PayPalConfig::from_env()?;
        Self::new(config)
    }

    /// Create a client with a custom transport
    pub fn with_transport(config: PayPalConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &PayPalConfig {
        &self.config
    }

    /// Send one request and map the reply.
    ///
    /// `form` must already be in wire encoding. On a provider failure the
    /// decoded response is returned inside [`PaymentError::Provider`].
    #[instrument(
        skip(self, form),
        fields(
            method = form.get("METHOD").unwrap_or_default(),
            sandbox = self.config.use_sandbox
        )
    )]
    pub async fn execute(&self, mut form: RequestFields) -> PaymentResult<NvpResponse> {
        form.set("USER", self.config.username.as_str());
        form.set("PWD", self.config.password.as_str());
        form.set("SIGNATURE", self.config.signature.as_str());
        form.set("VERSION", API_VERSION);

        let endpoint = self.config.endpoint();
        debug!("Posting {} fields to {}", form.len(), endpoint);

        let reply = self
            .transport
            .post_form(endpoint, &form.into_pairs())
            .await
            .map_err(|e| {
                error!("NVP transport failure: {}", e);
                e
            })?;

        if !reply.is_success() {
            error!("NVP endpoint returned HTTP {}", reply.status);
            return Err(PaymentError::Transport(format!(
                "HTTP {} from {}",
                reply.status, endpoint
            )));
        }

        let raw = decode_body(&reply.body).map_err(|e| {
            error!("Failed to decode NVP response: {}", e);
            PaymentError::from(e)
        })?;

        let response = NvpResponse::from_raw(raw, BUILD_KEY);
        match response.into_result() {
            Ok(response) => {
                info!(
                    "NVP call succeeded: ack={}, correlation_id={}",
                    response.status, response.correlation_id
                );
                Ok(response)
            }
            Err(err) => {
                let correlation_id = err
                    .response()
                    .map(|r| r.correlation_id.as_str())
                    .unwrap_or_default();
                warn!("NVP call rejected: {}, correlation_id={}", err, correlation_id);
                Err(err)
            }
        }
    }

    /// Send a typed request
    pub async fn send<R: NvpRequest>(&self, request: &R) -> PaymentResult<NvpResponse> {
        self.execute(request.to_fields()).await
    }

    /// Start a digital-goods express checkout.
    ///
    /// On success the response carries the `TOKEN` to redirect the buyer with.
    pub async fn set_express_checkout_digital_goods(
        &self,
        amount: Decimal,
        currency_code: &str,
        return_url: &str,
        cancel_url: &str,
        items: &[LineItem],
    ) -> PaymentResult<NvpResponse> {
        self.send(&SetExpressCheckout {
            amount,
            currency_code: currency_code.to_string(),
            return_url: return_url.to_string(),
            cancel_url: cancel_url.to_string(),
            items: items.to_vec(),
        })
        .await
    }

    /// Capture an approved express checkout
    pub async fn confirm_express_checkout_payment(
        &self,
        token: &str,
        payer_id: &str,
        payment_action: &str,
        currency_code: &str,
        final_amount: Decimal,
    ) -> PaymentResult<NvpResponse> {
        self.send(&DoExpressCheckoutPayment {
            token: token.to_string(),
            payer_id: payer_id.to_string(),
            payment_action: payment_action.to_string(),
            currency_code: currency_code.to_string(),
            amount: final_amount,
        })
        .await
    }
}
