//! Decimal-first numerics and percentage helpers.
//!
//! All arithmetic is checked; overflow surfaces as `CoreError::Overflow`
//! instead of panicking. `rust_decimal` division is rounded at 28 fractional
//! digits, so callers that need an exact sum must correct it themselves.

use core::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::errors::CoreError;

pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Largest `digits` accepted by [`pow10`].
pub const MAX_POW10_DIGITS: u32 = 18;

/// Fractional digits kept on engine percentages. At this scale every value in
/// `[0, 100]` and any sum of them fits the mantissa, so additions are exact.
pub const PERCENT_DP: u32 = 18;

/// Truncate a percentage to [`PERCENT_DP`] digits. Truncation never rounds
/// up, so a set of quantized shares of one total never sums above 100.
#[inline]
pub fn quantize_percent(v: Decimal) -> Decimal {
    v.round_dp_with_strategy(PERCENT_DP, rust_decimal::RoundingStrategy::ToZero)
}

/// `amount / total * 100`, multiplying first when that does not overflow.
pub fn percent_of(amount: Decimal, total: Decimal) -> Result<Decimal, CoreError> {
    if total.is_zero() {
        return Err(CoreError::DivisionByZero);
    }
    if let Some(p) = amount.checked_mul(HUNDRED).and_then(|x| x.checked_div(total)) {
        return Ok(p);
    }
    amount
        .checked_div(total)
        .and_then(|x| x.checked_mul(HUNDRED))
        .ok_or(CoreError::Overflow)
}

/// Overflow-checked sum.
pub fn checked_sum<I: IntoIterator<Item = Decimal>>(it: I) -> Result<Decimal, CoreError> {
    it.into_iter()
        .try_fold(Decimal::ZERO, |acc, x| acc.checked_add(x))
        .ok_or(CoreError::Overflow)
}

/// Non-negative check that treats `-0` as zero.
#[inline]
pub fn is_negative(v: Decimal) -> bool {
    v.is_sign_negative() && !v.is_zero()
}

/// Convert a float, rejecting NaN and infinities.
pub fn decimal_from_f64(v: f64) -> Result<Decimal, CoreError> {
    if !v.is_finite() {
        return Err(CoreError::NonFinite);
    }
    Decimal::from_f64(v).ok_or(CoreError::Overflow)
}

/// Parse plain (`"12.5"`) or scientific (`"1.25e1"`) notation.
pub fn parse_decimal(s: &str) -> Result<Decimal, CoreError> {
    let t = s.trim();
    Decimal::from_str(t)
        .or_else(|_| Decimal::from_scientific(t))
        .map_err(|_| CoreError::InvalidDecimal(t.to_string()))
}

/// `10^digits` as a decimal.
pub fn pow10(digits: u32) -> Result<Decimal, CoreError> {
    if digits > MAX_POW10_DIGITS {
        return Err(CoreError::DomainOutOfRange("digits"));
    }
    Ok(Decimal::from(10u64.pow(digits)))
}
