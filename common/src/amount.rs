use alloy_primitives::{
    utils::{format_units, parse_units, ParseUnits},
    U256,
};

use crate::{Result, WithdrawError};

/// Decimals used by `parseEther`-style amounts.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Scale a human-readable token amount (e.g. "1.5") to base units.
///
/// Negative values, empty input, and more fractional digits than `decimals`
/// are rejected instead of being truncated.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256> {
    let invalid = |reason: String| WithdrawError::InvalidAmount {
        amount: amount.to_string(),
        reason,
    };

    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty amount".into()));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("amount must not be negative".into()));
    }
    // Trailing zeros carry no precision.
    let normalized = match trimmed.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.len() > decimals as usize {
                return Err(invalid(format!(
                    "{} fractional digits exceed token precision of {decimals}",
                    fraction.len()
                )));
            }
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => trimmed.to_string(),
    };

    match parse_units(&normalized, decimals).map_err(|e| invalid(e.to_string()))? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(invalid("amount must not be negative".into())),
    }
}

/// Inverse of [`parse_amount`], always printing `decimals` fractional digits.
pub fn format_amount(value: U256, decimals: u8) -> Result<String> {
    format_units(value, decimals).map_err(|e| WithdrawError::InvalidAmount {
        amount: value.to_string(),
        reason: e.to_string(),
    })
}
