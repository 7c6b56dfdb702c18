//! # HTTP Transport
//!
//! The seam between the NVP client and the network. [`ReqwestTransport`] is
//! the production implementation; tests substitute their own.

use async_trait::async_trait;
use pay_core::{PaymentError, PaymentResult};
use reqwest::Client;
use std::time::Duration;

/// Raw HTTP reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Posts a form body and returns the full reply
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `form` as `application/x-www-form-urlencoded` to `url`.
    ///
    /// Connection errors, timeouts and body read failures map to
    /// [`PaymentError::Transport`].
    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> PaymentResult<HttpReply>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout
    pub fn new(timeout: Duration) -> PaymentResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self::with_client(client))
    }

    /// Wrap an existing client (shared pool, custom TLS, proxies)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> PaymentResult<HttpReply> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        Ok(HttpReply { status, body })
    }
}
