//! # Order Types
//!
//! Line items for digital-goods checkouts.

use crate::product::Product;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A digital good in a checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display name shown to the buyer
    pub name: String,

    /// Price of one unit
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_amount: Decimal,

    /// Quantity
    pub quantity: u32,
}

impl LineItem {
    pub fn new(name: impl Into<String>, unit_amount: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            unit_amount,
            quantity,
        }
    }

    /// Create a line item from a catalog product
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self::new(product.name.clone(), product.price, quantity)
    }

    /// Unit amount times quantity
    pub fn total(&self) -> Decimal {
        self.unit_amount * Decimal::from(self.quantity)
    }
}

/// Sum of all line totals
pub fn order_total(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::total).sum()
}
