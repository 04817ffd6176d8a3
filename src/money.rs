//! Money

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Currency every storefront price is quoted in.
pub const STORE_CURRENCY: &Currency = rusty_money::iso::USD;

/// Errors raised while parsing a price string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The text is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),

    /// The amount is negative or too large to represent in minor units.
    #[error("price out of range: {0}")]
    OutOfRange(String),
}

/// Wrap an amount of minor units as store-currency money.
#[must_use]
pub fn money(minor_units: u64) -> Money<'static, Currency> {
    Money::from_minor(i64::try_from(minor_units).unwrap_or(i64::MAX), STORE_CURRENCY)
}

/// Format an amount of minor units for display, e.g. `750` as `$7.50`.
#[must_use]
pub fn format_currency(minor_units: u64) -> String {
    money(minor_units).to_string()
}

/// Cost of `quantity` units at `unit_price`, saturating at the maximum amount.
#[must_use]
pub fn line_total(unit_price: u64, quantity: u32) -> u64 {
    unit_price.saturating_mul(u64::from(quantity))
}

/// Parse a major-unit price string (e.g. `"7.50"`) into minor units.
///
/// # Errors
///
/// Returns [`PriceError::Invalid`] if the text is not a decimal number and
/// [`PriceError::OutOfRange`] if it is negative or does not fit in `u64`.
pub fn parse_price(s: &str) -> Result<u64, PriceError> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| PriceError::Invalid(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(PriceError::OutOfRange(s.to_string()));
    }

    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_u64())
        .ok_or_else(|| PriceError::OutOfRange(s.to_string()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn format_currency_uses_dollars_and_cents() {
        assert_eq!(format_currency(750), "$7.50");
        assert_eq!(format_currency(2500), "$25.00");
        assert_eq!(format_currency(0), "$0.00");
    }

    #[test]
    fn line_total_multiplies_quantity() {
        assert_eq!(line_total(1000, 2), 2000);
        assert_eq!(line_total(u64::MAX, 2), u64::MAX);
    }

    #[test]
    fn parse_price_converts_to_minor_units() -> TestResult {
        assert_eq!(parse_price("7.50")?, 750);
        assert_eq!(parse_price("25")?, 2500);
        assert_eq!(parse_price(" 0.999 ")?, 100);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_bad_input() {
        assert!(matches!(parse_price("seven"), Err(PriceError::Invalid(_))));
        assert!(matches!(parse_price("-1.00"), Err(PriceError::OutOfRange(_))));
    }
}
