//! # pay-core
//!
//! Core types for the NVP express-checkout client.
//!
//! This crate provides:
//! - `RequestFields`, the flat name/value form sent to the provider
//! - `NvpResponse` and `FailureDetail`, with the success/failure mapping
//! - `LineItem`, `Product` and `ProductCatalog` for digital goods
//! - `format_amount` for the provider's two-decimal amount encoding
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{LineItem, NvpResponse, RawFields};
//! use rust_decimal::Decimal;
//!
//! let items = vec![LineItem::new("Album", Decimal::new(999, 2), 1)];
//!
//! // After decoding a reply body into RawFields:
//! let response = NvpResponse::from_raw(raw, "BUILD").into_result()?;
//! println!("token = {:?}", response.token());
//! ```

pub mod error;
pub mod fields;
pub mod money;
pub mod order;
pub mod product;
pub mod response;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use fields::RequestFields;
pub use money::{format_amount, format_quantity};
pub use order::{order_total, LineItem};
pub use product::{Product, ProductCatalog};
pub use response::{FailureDetail, NvpResponse, ProviderErrorEntry, RawFields};
pub use rust_decimal::Decimal;
