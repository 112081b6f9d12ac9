//! Money helpers
//!
//! Prices travel as JSON numbers and are held as [`Decimal`] so that
//! `25.90 + 15.90` is exactly `41.80`. Display is two decimals, `R$` prefix.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{SchemaError, SchemaResult};

/// Round to centavos (half away from zero)
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount for display
///
/// ```
/// use rust_decimal::Decimal;
/// use shared::money::format_price;
///
/// assert_eq!(format_price(Decimal::new(4180, 2)), "R$ 41.80");
/// assert_eq!(format_price(Decimal::new(5, 0)), "R$ 5.00");
/// ```
pub fn format_price(amount: Decimal) -> String {
    format!("R$ {:.2}", round_money(amount))
}

/// Parse an amount typed by a person (`"50"`, `"50,00"`, `"R$ 50.5"`)
pub fn parse_amount(raw: &str) -> SchemaResult<Decimal> {
    let cleaned = raw
        .trim()
        .trim_start_matches("R$")
        .trim()
        .replace(',', ".");
    if cleaned.is_empty() {
        return Err(SchemaError::InvalidAmount(raw.to_string()));
    }
    let amount: Decimal = cleaned
        .parse()
        .map_err(|_| SchemaError::InvalidAmount(raw.to_string()))?;
    if amount.is_sign_negative() {
        return Err(SchemaError::InvalidAmount(raw.to_string()));
    }
    Ok(amount)
}
