//! NVP response body decoding.
//!
//! Bodies are `application/x-www-form-urlencoded`: `&`-separated pairs, the
//! first `=` splits key from value, `+` means space and `%XX` escapes are
//! decoded. Unlike lenient form parsers, a malformed escape or non-UTF-8
//! result is rejected, as is any key that is not an NVP field name. An HTML
//! error page or JSON body served with HTTP 200 is therefore a decode
//! failure rather than an empty success.

use pay_core::{PaymentError, RawFields};
use percent_encoding::percent_decode_str;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty response body")]
    Empty,

    #[error("invalid percent escape in {0:?}")]
    InvalidEscape(String),

    #[error("invalid UTF-8 in {0:?}")]
    InvalidUtf8(String),

    #[error("not an NVP field name: {0:?}")]
    InvalidKey(String),

    #[error("no fields in response body")]
    NoFields,
}

impl From<DecodeError> for PaymentError {
    fn from(err: DecodeError) -> Self {
        PaymentError::Decode(err.to_string())
    }
}

/// Decode a response body into fields. The first value wins for duplicate keys.
pub fn decode_body(body: &str) -> Result<RawFields, DecodeError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut fields = RawFields::new();
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key)?;
        if key.is_empty() {
            continue;
        }
        if !is_field_name(&key) {
            return Err(DecodeError::InvalidKey(key));
        }
        fields.insert_if_absent(key, decode_component(value)?);
    }

    if fields.is_empty() {
        return Err(DecodeError::NoFields);
    }
    Ok(fields)
}

fn decode_component(raw: &str) -> Result<String, DecodeError> {
    if !has_valid_escapes(raw) {
        return Err(DecodeError::InvalidEscape(raw.to_string()));
    }
    let plus_as_space = raw.replace('+', " ");
    percent_decode_str(&plus_as_space)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| DecodeError::InvalidUtf8(raw.to_string()))
}

fn is_field_name(key: &str) -> bool {
    key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

// percent_decode_str passes a stray `%` through untouched, so escapes are
// checked first.
fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}
