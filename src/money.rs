//! Amounts and Currencies

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use thiserror::Error;

/// Currency used when a booking request names none.
pub const DEFAULT_CURRENCY_CODE: &str = "CRC";

/// Errors raised while resolving currency data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// Not a 3-letter ISO-4217 code known to the currency table.
    #[error("unknown currency code `{0}`")]
    UnknownCode(String),
}

/// Look up an ISO-4217 currency by its alphabetic code, ignoring case.
///
/// # Errors
///
/// Returns [`CurrencyError::UnknownCode`] for codes that are not three ASCII
/// letters or are missing from the currency table.
pub fn find_currency(code: &str) -> Result<&'static iso::Currency, CurrencyError> {
    let code = code.trim();

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CurrencyError::UnknownCode(code.to_string()));
    }

    iso::find(&code.to_ascii_uppercase())
        .ok_or_else(|| CurrencyError::UnknownCode(code.to_string()))
}

/// Wrap a decimal amount in its currency for display and arithmetic.
pub fn to_money(
    amount: Decimal,
    currency: &'static iso::Currency,
) -> Money<'static, iso::Currency> {
    Money::from_decimal(amount, currency)
}
