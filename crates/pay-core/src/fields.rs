//! # Request Fields
//!
//! The flat name/value form sent to the provider. Values are stored already
//! encoded (amounts via [`crate::money::format_amount`]); the transport only
//! appends credentials and serializes.

use serde::Serialize;

/// Ordered set of request fields.
///
/// Setting an existing key replaces its value in place, so the wire order
/// follows first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequestFields(Vec<(String, String)>);

impl RequestFields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Set a field
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder: set a field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set the field `{prefix}{index}` (`L_PAYMENTREQUEST_0_NAME0`, ...)
    pub fn set_indexed(&mut self, prefix: &str, index: usize, value: impl Into<String>) {
        self.set(format!("{}{}", prefix, index), value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
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

    /// Consume into wire pairs
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}
