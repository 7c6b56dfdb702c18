//! # Payment Error Types
//!
//! Typed error handling for the NVP checkout client.
//! All payment operations return `Result<T, PaymentError>`.

use crate::response::{FailureDetail, NvpResponse};
use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing credentials, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Connection failure, timeout, unreadable body or non-2xx HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body is not a well-formed NVP payload
    #[error("Decode error: {0}")]
    Decode(String),

    /// Well-formed response in which the provider rejected the request.
    ///
    /// The decoded response is carried alongside the failure detail so the
    /// caller can still read the correlation id and raw fields.
    #[error("{detail}")]
    Provider {
        detail: FailureDetail,
        response: Box<NvpResponse>,
    },
}

impl PaymentError {
    /// Returns true if this error is transient.
    ///
    /// Informational only: nothing in this workspace retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::Transport(_))
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::ProductNotFound { .. } => 404,
            PaymentError::Transport(_) => 503,
            PaymentError::Decode(_) => 502,
            PaymentError::Provider { .. } => 502,
        }
    }

    /// Failure detail, if the provider rejected the request
    pub fn failure_detail(&self) -> Option<&FailureDetail> {
        match self {
            PaymentError::Provider { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// Decoded response that accompanied a provider failure
    pub fn response(&self) -> Option<&NvpResponse> {
        match self {
            PaymentError::Provider { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
