use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::LoopError;

/// Reject margins that would borrow nothing or borrow right at the liquidation boundary
pub fn validate_safety_margin(safety_margin_bps: u16) -> Result<()> {
    require!(
        safety_margin_bps > 0 && (safety_margin_bps as u64) < BPS_PRECISION,
        LoopError::InvalidSafetyMargin
    );
    Ok(())
}

/// Size a borrow from the pool's remaining capacity
/// amount = available_borrows_value * safety_margin / price, in the borrowed token's smallest unit
pub fn compute_borrow_amount(
    available_borrows_value: u64,
    price: u64,
    price_decimals: u8,
    safety_margin_bps: u16,
    token_decimals: u8,
    valuation_decimals: u8,
) -> Result<u64> {
    // Checked before any division
    require!(price > 0, LoopError::InvalidOraclePrice);
    validate_safety_margin(safety_margin_bps)?;

    if available_borrows_value == 0 {
        return Ok(0);
    }

    let mut numerator = (available_borrows_value as u128)
        .checked_mul(safety_margin_bps as u128)
        .ok_or(error!(LoopError::MathOverflow))?;
    let mut denominator = (price as u128)
        .checked_mul(BPS_PRECISION as u128)
        .ok_or(error!(LoopError::MathOverflow))?;

    // valuation units -> token units
    let scale = price_decimals as i32 + token_decimals as i32 - valuation_decimals as i32;
    if scale >= 0 {
        numerator = numerator
            .checked_mul(pow10(scale.unsigned_abs())?)
            .ok_or(error!(LoopError::MathOverflow))?;
    } else {
        denominator = denominator
            .checked_mul(pow10(scale.unsigned_abs())?)
            .ok_or(error!(LoopError::MathOverflow))?;
    }

    let amount = numerator
        .checked_div(denominator)
        .ok_or(error!(LoopError::MathOverflow))?;

    u64::try_from(amount).map_err(|_| error!(LoopError::MathOverflow))
}

/// Value of a token amount in the pool's valuation unit
pub fn value_of_amount(
    amount: u64,
    price: u64,
    price_decimals: u8,
    token_decimals: u8,
    valuation_decimals: u8,
) -> Result<u64> {
    let mut numerator = (amount as u128)
        .checked_mul(price as u128)
        .ok_or(error!(LoopError::MathOverflow))?;
    let mut denominator: u128 = 1;

    let scale = valuation_decimals as i32 - price_decimals as i32 - token_decimals as i32;
    if scale >= 0 {
        numerator = numerator
            .checked_mul(pow10(scale.unsigned_abs())?)
            .ok_or(error!(LoopError::MathOverflow))?;
    } else {
        denominator = pow10(scale.unsigned_abs())?;
    }

    let value = numerator
        .checked_div(denominator)
        .ok_or(error!(LoopError::MathOverflow))?;

    u64::try_from(value).map_err(|_| error!(LoopError::MathOverflow))
}

/// Parse a display amount ("0.02") into smallest units
pub fn parse_units(value: &str, decimals: u8) -> Result<u64> {
    let value = value.trim();
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (value, ""),
    };

    require!(
        !(whole.is_empty() && fraction.is_empty()),
        LoopError::InvalidAmount
    );
    require!(
        fraction.len() <= decimals as usize,
        LoopError::InvalidAmount
    );
    require!(
        whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()),
        LoopError::InvalidAmount
    );

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| error!(LoopError::InvalidAmount))?
    };
    let padded = format!("{:0<width$}", fraction, width = decimals as usize);
    let fraction: u64 = if padded.is_empty() {
        0
    } else {
        padded.parse().map_err(|_| error!(LoopError::InvalidAmount))?
    };

    whole
        .checked_mul(10u64.checked_pow(decimals as u32).ok_or(error!(LoopError::MathOverflow))?)
        .and_then(|units| units.checked_add(fraction))
        .ok_or(error!(LoopError::MathOverflow))
}

/// Render smallest units for logs, e.g. 20_000_000 with 9 decimals -> "0.020000000"
pub fn format_units(amount: u64, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let amount = amount as u128;
    // Past 10^38 every u64 amount is below one whole unit
    let (whole, fraction) = match 10u128.checked_pow(decimals as u32) {
        Some(base) => (amount / base, amount % base),
        None => (0, amount),
    };
    format!("{}.{:0>width$}", whole, fraction, width = decimals as usize)
}

fn pow10(exp: u32) -> Result<u128> {
    10u128
        .checked_pow(exp)
        .ok_or(error!(LoopError::MathOverflow))
}
