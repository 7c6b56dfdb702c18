//! # Money Formatting
//!
//! The provider expects every amount as a plain decimal string with exactly
//! two fraction digits (`"10.00"`).

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fraction digits sent for every amount
pub const AMOUNT_SCALE: u32 = 2;

/// Format an amount with exactly two fraction digits.
///
/// Midpoints round away from zero on the exact decimal value, so `10.005`
/// becomes `"10.01"` and `10.004` becomes `"10.00"`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Format a quantity as a base-10 integer
pub fn format_quantity(quantity: u32) -> String {
    quantity.to_string()
}
