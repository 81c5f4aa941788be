//! Amount field handling.

use alloy_primitives::U256;
use alloy_primitives::utils::{UnitsError, parse_units};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmountError {
    #[error("enter an amount")]
    Empty,
    #[error("at most {decimals} decimal places are supported")]
    TooManyDecimals { decimals: u8 },
    #[error(transparent)]
    Units(#[from] UnitsError),
}

/// Normalise raw keyboard input into a decimal string.
///
/// Commas become dots, everything except digits and dots is dropped, and
/// any dot after the first is removed so the fractional digits join up.
pub fn sanitize_amount(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut seen_dot = false;
    for ch in raw.chars() {
        match ch {
            '0'..='9' => out.push(ch),
            '.' | ',' if !seen_dot => {
                seen_dot = true;
                out.push('.');
            }
            _ => {}
        }
    }
    out
}

/// Convert a sanitised amount into the token's base units.
///
/// More fractional digits than the token carries is an error rather than a
/// silent truncation.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let mut normalized = amount.trim_end_matches('.').to_owned();
    if normalized.is_empty() {
        return Err(AmountError::Empty);
    }
    if normalized.starts_with('.') {
        normalized.insert(0, '0');
    }
    if let Some((_, fraction)) = normalized.split_once('.') {
        if fraction.len() > usize::from(decimals) {
            return Err(AmountError::TooManyDecimals { decimals });
        }
    }
    Ok(parse_units(&normalized, decimals)?.get_absolute())
}

/// True when the amount converts to a non-zero number of base units.
pub fn is_positive_amount(amount: &str, decimals: u8) -> bool {
    to_base_units(amount, decimals).is_ok_and(|units| !units.is_zero())
}
