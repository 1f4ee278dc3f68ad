//! Utility functions and helpers

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits carried by every quoted amount
pub const AMOUNT_DECIMALS: u32 = 6;

/// Convert a float into an exact decimal with `dp` fractional digits.
/// `None` when the value is not finite or too large to carry `dp` digits.
pub fn to_fixed(value: f64, dp: u32) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    let mut fixed = Decimal::from_f64(value)?
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    fixed.rescale(dp);
    (fixed.scale() == dp).then_some(fixed)
}

/// Same as [`to_fixed`] with the quote precision
pub fn to_amount(value: f64) -> Option<Decimal> {
    to_fixed(value, AMOUNT_DECIMALS)
}

pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Round half away from zero to `dp` decimal places
pub fn round_to(value: f64, dp: i32) -> f64 {
    let factor = 10_f64.powi(dp);
    (value * factor).round() / factor
}

/// Scale a decimal amount into integer base units (e.g. ether -> wei)
pub fn parse_units(amount: Decimal, decimals: u32) -> Option<u128> {
    if amount.is_sign_negative() {
        return None;
    }
    let factor = Decimal::try_from_i128_with_scale(10i128.checked_pow(decimals)?, 0).ok()?;
    let mut scaled = amount.checked_mul(factor)?.trunc();
    scaled.rescale(0);
    u128::try_from(scaled.mantissa()).ok()
}

/// Render integer base units as a decimal string (e.g. wei -> ether)
pub fn format_units(value: u128, decimals: u32) -> String {
    match i128::try_from(value)
        .ok()
        .and_then(|v| Decimal::try_from_i128_with_scale(v, decimals).ok())
    {
        Some(d) => d.normalize().to_string(),
        None => format!("{}e-{}", value, decimals),
    }
}

/// Lowercase hex string of `len` random digits
pub fn random_hex(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect()
}

/// Lowercase base-36 string of `len` random digits
pub fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from_digit(rng.gen_range(0..36), 36).unwrap_or('0'))
        .collect()
}

pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(char::from_digit((value % 36) as u32, 36).unwrap_or('0'));
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Current time plus `minutes`, `None` when out of chrono's range
pub fn deadline_after(minutes: i64) -> Option<DateTime<Utc>> {
    Duration::try_minutes(minutes).and_then(|delta| Utc::now().checked_add_signed(delta))
}

/// Milliseconds since the unix epoch
pub fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
