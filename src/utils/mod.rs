/*
 * Fixed-point parsing and formatting helpers
 */

use ethers::types::{Address, U256};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::curve::{scale, DECIMALS};
use crate::models::{LaunchpadError, QuoteError, Result};

/// Decimal places kept in price impact percentages.
pub const PERCENT_DECIMALS: u32 = 6;

/// Parses a user-typed amount (`^\d*\.?\d*$`) into 18-decimal fixed point.
///
/// Empty input and a lone `.` read as zero, matching a half-typed field.
pub fn parse_amount(input: &str) -> std::result::Result<U256, QuoteError> {
    let valid_chars = input.chars().all(|c| c.is_ascii_digit() || c == '.');
    if !valid_chars || input.matches('.').count() > 1 {
        return Err(QuoteError::InvalidAmount(format!("not a decimal number: {input:?}")));
    }

    let (whole, frac) = input.split_once('.').unwrap_or((input, ""));
    if frac.len() > DECIMALS as usize {
        return Err(QuoteError::InvalidAmount(format!(
            "more than {DECIMALS} fractional digits: {input:?}"
        )));
    }

    let whole = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole)
            .map_err(|e| QuoteError::InvalidAmount(format!("amount out of range: {e}")))?
    };
    let frac = if frac.is_empty() {
        U256::zero()
    } else {
        let padded = format!("{frac:0<width$}", width = DECIMALS as usize);
        U256::from_dec_str(&padded)
            .map_err(|e| QuoteError::InvalidAmount(format!("bad fraction: {e}")))?
    };

    whole
        .checked_mul(scale())
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| QuoteError::InvalidAmount(format!("amount out of range: {input:?}")))
}

/// Renders a fixed-point integer with `decimals` places as a `Decimal`.
///
/// Values wider than 96 bits lose trailing fractional digits (truncated).
pub fn to_decimal(value: U256, decimals: u32) -> Result<Decimal> {
    let limit = U256::one() << 96;
    let mut mantissa = value;
    let mut scale = decimals;
    while mantissa >= limit && scale > 0 {
        mantissa = mantissa / 10;
        scale -= 1;
    }
    if mantissa >= limit {
        return Err(LaunchpadError::CalculationError(format!(
            "value too large for decimal output: {value}"
        )));
    }

    #[allow(clippy::cast_possible_wrap)]
    let raw = mantissa.as_u128() as i128;
    Decimal::try_from_i128_with_scale(raw, scale)
        .map(|d| d.normalize())
        .map_err(|e| LaunchpadError::CalculationError(format!("Decimal conversion error: {e}")))
}

/// Shorthand for 18-decimal wei amounts.
pub fn wei_to_decimal(value: U256) -> Result<Decimal> {
    to_decimal(value, DECIMALS)
}

/// Relative deviation `numerator / denominator` as a percentage with
/// [`PERCENT_DECIMALS`] places, truncated.
pub fn ratio_percent(
    numerator: U256,
    denominator: U256,
) -> std::result::Result<Decimal, QuoteError> {
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let scaled = numerator
        .checked_mul(U256::from(100u64) * U256::exp10(PERCENT_DECIMALS as usize))
        .ok_or_else(|| QuoteError::CurveMathError("overflow in price impact".to_string()))?
        / denominator;
    to_decimal(scaled, PERCENT_DECIMALS)
        .map_err(|e| QuoteError::CurveMathError(e.to_string()))
}

pub fn parse_address(address: &str) -> Result<Address> {
    if !address.starts_with("0x") || address.len() != 42 {
        return Err(LaunchpadError::ConfigError(format!("Invalid address format: {address}")));
    }
    Address::from_str(address)
        .map_err(|e| LaunchpadError::ConfigError(format!("Invalid address {address}: {e}")))
}
