//! # PayPal Configuration
//!
//! API credentials and endpoint selection for the NVP API.
//! Secrets are loaded from environment variables.

use pay_core::PaymentError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::env;
use std::fmt;
use std::time::Duration;

/// Sandbox NVP endpoint
pub const SANDBOX_ENDPOINT: &str = "https://api-3t.sandbox.paypal.com/nvp";

/// Production NVP endpoint
pub const PRODUCTION_ENDPOINT: &str = "https://api-3t.paypal.com/nvp";

/// NVP protocol version sent with every request
pub const API_VERSION: &str = "84";

const SANDBOX_CHECKOUT_URL: &str = "https://www.sandbox.paypal.com/cgi-bin/webscr";
const PRODUCTION_CHECKOUT_URL: &str = "https://www.paypal.com/cgi-bin/webscr";

// RFC 3986 unreserved characters pass through
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// NVP API configuration.
///
/// Immutable once built; every request reads it by reference.
#[derive(Clone)]
pub struct PayPalConfig {
    /// API username (account identifier)
    pub username: String,

    /// API password
    pub password: String,

    /// API signature
    pub signature: String,

    /// Route requests to the sandbox instead of production
    pub use_sandbox: bool,

    sandbox_endpoint: String,
    production_endpoint: String,
    timeout: Duration,
}

impl PayPalConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYPAL_API_USERNAME`
    /// - `PAYPAL_API_PASSWORD`
    /// - `PAYPAL_API_SIGNATURE`
    ///
    /// `PAYPAL_SANDBOX` is optional and defaults to `true`.
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PaymentError::Configuration(format!("{} not set", key)))
        };

        let username = required("PAYPAL_API_USERNAME")?;
        let password = required("PAYPAL_API_PASSWORD")?;
        let signature = required("PAYPAL_API_SIGNATURE")?;

        let use_sandbox = match lookup("PAYPAL_SANDBOX") {
            None => true,
            Some(value) => parse_flag(&value).ok_or_else(|| {
                PaymentError::Configuration(format!(
                    "PAYPAL_SANDBOX must be true or false, got {:?}",
                    value
                ))
            })?,
        };

        Ok(Self::new(username, password, signature, use_sandbox))
    }

    /// Create config with explicit values
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        signature: impl Into<String>,
        use_sandbox: bool,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            signature: signature.into(),
            use_sandbox,
            sandbox_endpoint: SANDBOX_ENDPOINT.to_string(),
            production_endpoint: PRODUCTION_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The endpoint requests are posted to
    pub fn endpoint(&self) -> &str {
        if self.use_sandbox {
            &self.sandbox_endpoint
        } else {
            &self.production_endpoint
        }
    }

    /// Request timeout applied by the default transport
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// URL the buyer is redirected to in order to approve a checkout token
    pub fn checkout_redirect_url(&self, token: &str) -> String {
        let base = if self.use_sandbox {
            SANDBOX_CHECKOUT_URL
        } else {
            PRODUCTION_CHECKOUT_URL
        };
        let token = utf8_percent_encode(token, QUERY_VALUE);
        format!("{}?cmd=_express-checkout&token={}", base, token)
    }

    /// Builder: override both endpoints (for testing/mocking)
    pub fn with_endpoints(
        mut self,
        sandbox: impl Into<String>,
        production: impl Into<String>,
    ) -> Self {
        self.sandbox_endpoint = sandbox.into();
        self.production_endpoint = production.into();
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for PayPalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayPalConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("signature", &"<redacted>")
            .field("use_sandbox", &self.use_sandbox)
            .field("endpoint", &self.endpoint())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
