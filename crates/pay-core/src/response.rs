//! # NVP Response Types
//!
//! Decoded provider responses and the mapping from a decoded response to
//! either a success value or a [`PaymentError::Provider`].

use crate::error::{PaymentError, PaymentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Acknowledgement status field
pub const ACK: &str = "ACK";
/// Provider-side correlation id, quoted in support requests
pub const CORRELATION_ID: &str = "CORRELATIONID";
/// Provider timestamp (RFC 3339)
pub const TIMESTAMP: &str = "TIMESTAMP";
/// Protocol version echoed by the provider
pub const VERSION: &str = "VERSION";
/// Checkout token returned by SetExpressCheckout
pub const TOKEN: &str = "TOKEN";

const ERROR_CODE_PREFIX: &str = "L_ERRORCODE";
const SHORT_MESSAGE_PREFIX: &str = "L_SHORTMESSAGE";
const LONG_MESSAGE_PREFIX: &str = "L_LONGMESSAGE";
const SEVERITY_PREFIX: &str = "L_SEVERITYCODE";

const UNAVAILABLE_MESSAGE: &str = "Provider unavailable, please try again later";

/// Every field of a decoded response, keyed by provider field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFields(BTreeMap<String, String>);

impl RawFields {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a field, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert a field unless the key is already present (first value wins)
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Field value, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Field value, or the empty string when absent
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A decoded NVP response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvpResponse {
    /// Acknowledgement status (`Success`, `SuccessWithWarning`, `Failure`, ...)
    pub status: String,
    pub correlation_id: String,
    pub timestamp: String,
    pub version: String,
    pub build: String,
    /// The full decoded response, including fields not surfaced above
    pub raw_fields: RawFields,
}

impl NvpResponse {
    /// Build a response from decoded fields.
    ///
    /// `build_key` names the field holding the provider build id.
    pub fn from_raw(raw_fields: RawFields, build_key: &str) -> Self {
        Self {
            status: raw_fields.get_or_empty(ACK).to_string(),
            correlation_id: raw_fields.get_or_empty(CORRELATION_ID).to_string(),
            timestamp: raw_fields.get_or_empty(TIMESTAMP).to_string(),
            version: raw_fields.get_or_empty(VERSION).to_string(),
            build: raw_fields.get_or_empty(build_key).to_string(),
            raw_fields,
        }
    }

    /// Any field of the response
    pub fn get(&self, key: &str) -> Option<&str> {
        self.raw_fields.get(key)
    }

    /// Checkout token (present on SetExpressCheckout / DoExpressCheckoutPayment replies)
    pub fn token(&self) -> Option<&str> {
        self.get(TOKEN).filter(|t| !t.is_empty())
    }

    /// True for `Success` and `SuccessWithWarning`
    pub fn is_success(&self) -> bool {
        self.status.to_ascii_lowercase().starts_with("success")
    }

    /// Provider timestamp parsed as UTC
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// All indexed errors (`L_ERRORCODE0`, `L_ERRORCODE1`, ...) in index order
    pub fn errors(&self) -> Vec<ProviderErrorEntry> {
        (0..)
            .map_while(|i| ProviderErrorEntry::at_index(&self.raw_fields, i))
            .collect()
    }

    /// Classify the response.
    ///
    /// Only index 0 of the error fields is consulted. The response fails when
    /// `L_ERRORCODE0` is non-empty or ACK is `Failure`/`FailureWithWarning`
    /// (case-insensitive).
    pub fn failure(&self) -> Option<FailureDetail> {
        let first = ProviderErrorEntry::at_index(&self.raw_fields, 0).unwrap_or_default();
        let ack = self.status.to_ascii_lowercase();

        if first.error_code.is_empty() && ack != "failure" && ack != "failurewithwarning" {
            return None;
        }

        Some(FailureDetail {
            status: self.status.clone(),
            error_code: first.error_code,
            short_message: first.short_message,
            long_message: first.long_message,
            severity: first.severity,
        })
    }

    /// Map the response to `Ok(self)` or a provider failure carrying `self`
    pub fn into_result(self) -> PaymentResult<Self> {
        match self.failure() {
            Some(detail) => Err(PaymentError::Provider {
                detail,
                response: Box::new(self),
            }),
            None => Ok(self),
        }
    }
}

/// One indexed error group from a response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrorEntry {
    pub error_code: String,
    pub short_message: String,
    pub long_message: String,
    pub severity: String,
}

impl ProviderErrorEntry {
    fn at_index(raw: &RawFields, index: usize) -> Option<Self> {
        let code = format!("{}{}", ERROR_CODE_PREFIX, index);
        let short = format!("{}{}", SHORT_MESSAGE_PREFIX, index);
        let long = format!("{}{}", LONG_MESSAGE_PREFIX, index);
        let severity = format!("{}{}", SEVERITY_PREFIX, index);

        if ![&code, &short, &long, &severity]
            .iter()
            .any(|k| raw.contains_key(k))
        {
            return None;
        }

        Some(Self {
            error_code: raw.get_or_empty(&code).to_string(),
            short_message: raw.get_or_empty(&short).to_string(),
            long_message: raw.get_or_empty(&long).to_string(),
            severity: raw.get_or_empty(&severity).to_string(),
        })
    }
}

/// Provider rejection details, taken from the index-0 error fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub status: String,
    pub error_code: String,
    pub short_message: String,
    pub long_message: String,
    pub severity: String,
}

impl FailureDetail {
    /// Human-readable message
    pub fn message(&self) -> String {
        if !self.error_code.is_empty() && !self.short_message.is_empty() {
            format!("Provider Error {}: {}", self.error_code, self.short_message)
        } else if !self.status.is_empty() {
            self.status.clone()
        } else {
            UNAVAILABLE_MESSAGE.to_string()
        }
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
