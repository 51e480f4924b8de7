//! Largest-remainder display rounding for legend percentages.
//!
//! Contract:
//! - Inputs are fractions in `[0, 1]`. Each is scaled by `total` units and
//!   floored; the units still missing to reach `total` go one each to the
//!   largest fractional remainders (remainder ↓, then index ↑).
//! - A value that already received a unit is not picked again.
//! - Distribution stops early when the best remaining remainder is zero, i.e.
//!   the inputs did not sum to 1; no unit is invented.
//! - Results are returned in input order, divided back by `10^digits`.
//!
//! Determinism:
//! - Static ranking computed once; no RNG.

use sd_core::rounding::{self, HUNDRED};
use sd_core::variables::MAX_DISPLAY_DIGITS;
use sd_core::{Decimal, DistributionEntry, EntryIndex};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundingError {
    #[error("value {value} at index {index} is outside [0, 1]")]
    ValueOutOfRange { index: usize, value: Decimal },
    #[error("display digits {0} out of range")]
    DigitsOutOfRange(u32),
    #[error("total must be a positive whole number of units")]
    BadTotal,
    #[error("arithmetic overflow")]
    Overflow,
}

/// A summarizer row with its display percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundedEntry {
    pub index: EntryIndex,
    /// Full-precision percentage from the summarizer.
    pub percentage: Decimal,
    /// Rounded to the requested digits; the column sums to 100.
    pub display: Decimal,
}

/// Scale `[0, 1]` fractions to whole units of `total`, then divide by `10^digits`.
pub fn scale_values_set(
    values: &[Decimal],
    digits: u32,
    total: Decimal,
) -> Result<Vec<Decimal>, RoundingError> {
    if digits > MAX_DISPLAY_DIGITS {
        return Err(RoundingError::DigitsOutOfRange(digits));
    }
    if total <= Decimal::ZERO || !total.fract().is_zero() {
        return Err(RoundingError::BadTotal);
    }
    if values.is_empty() {
        return Ok(Vec::new());
    }
    for (index, &value) in values.iter().enumerate() {
        if rounding::is_negative(value) || value > Decimal::ONE {
            return Err(RoundingError::ValueOutOfRange { index, value });
        }
    }

    let mut units: Vec<Decimal> = Vec::with_capacity(values.len());
    let mut remainders: Vec<Decimal> = Vec::with_capacity(values.len());
    let mut remaining = total;
    for &v in values {
        let scaled = v.checked_mul(total).ok_or(RoundingError::Overflow)?;
        let floor = scaled.floor();
        remaining -= floor;
        units.push(floor);
        remainders.push(scaled - floor);
    }

    // remainder ↓, index ↑
    let mut ranking: Vec<usize> = (0..values.len()).collect();
    ranking.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then_with(|| a.cmp(&b)));

    for ix in ranking {
        if remaining <= Decimal::ZERO || remainders[ix].is_zero() {
            break;
        }
        units[ix] += Decimal::ONE;
        remaining -= Decimal::ONE;
    }

    let scale = rounding::pow10(digits).map_err(|_| RoundingError::DigitsOutOfRange(digits))?;
    Ok(units.into_iter().map(|u| (u / scale).normalize()).collect())
}

/// Fractions → percentages with `digits` decimals.
pub fn percentage_list(values: &[Decimal], digits: u32) -> Result<Vec<Decimal>, RoundingError> {
    if digits > MAX_DISPLAY_DIGITS {
        return Err(RoundingError::DigitsOutOfRange(digits));
    }
    let total = rounding::pow10(2 + digits).map_err(|_| RoundingError::DigitsOutOfRange(digits))?;
    scale_values_set(values, digits, total)
}

/// Attach display percentages to summarizer output, keeping its order.
pub fn round_distribution(
    entries: &[DistributionEntry],
    digits: u32,
) -> Result<Vec<RoundedEntry>, RoundingError> {
    let fractions: Vec<Decimal> = entries
        .iter()
        .map(|e| e.percentage.checked_div(HUNDRED).ok_or(RoundingError::Overflow))
        .collect::<Result<_, _>>()?;
    let display = percentage_list(&fractions, digits)?;
    Ok(entries
        .iter()
        .zip(display)
        .map(|(e, d)| RoundedEntry { index: e.index, percentage: e.percentage, display: d })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn thirds_round_to_hundred() {
        let v = [dec!(1) / dec!(3), dec!(1) / dec!(3), dec!(1) / dec!(3)];
        let got = percentage_list(&v, 0).unwrap();
        assert_eq!(got, vec![dec!(34), dec!(33), dec!(33)]);
    }

    #[test]
    fn largest_remainder_wins_the_unit() {
        // 0.125 → 12.5, 0.3754 → 37.54, 0.4996 → 49.96  (floors 12+37+49 = 98)
        let v = [dec!(0.125), dec!(0.3754), dec!(0.4996)];
        let got = percentage_list(&v, 0).unwrap();
        assert_eq!(got, vec![dec!(12), dec!(38), dec!(50)]);
    }

    #[test]
    fn digits_keep_decimals() {
        let v = [dec!(2) / dec!(3), dec!(1) / dec!(3)];
        let got = percentage_list(&v, 1).unwrap();
        assert_eq!(got, vec![dec!(66.7), dec!(33.3)]);
    }

    #[test]
    fn short_sum_stops_early() {
        // sums to 0.5: no unit may be invented
        let got = percentage_list(&[dec!(0.25), dec!(0.25)], 0).unwrap();
        assert_eq!(got, vec![dec!(25), dec!(25)]);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            percentage_list(&[dec!(1.5)], 0),
            Err(RoundingError::ValueOutOfRange { index: 0, .. })
        ));
        assert_eq!(percentage_list(&[dec!(1)], 7), Err(RoundingError::DigitsOutOfRange(7)));
        assert_eq!(scale_values_set(&[dec!(1)], 0, dec!(10.5)), Err(RoundingError::BadTotal));
        assert!(percentage_list(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn rounded_distribution_sums_to_hundred() {
        let entries = crate::summarize(&[dec!(1), dec!(1), dec!(1)], dec!(3), 5).unwrap();
        let rounded = round_distribution(&entries, 0).unwrap();
        let sum: Decimal = rounded.iter().map(|r| r.display).sum();
        assert_eq!(sum, dec!(100));
        assert_eq!(rounded[0].display, dec!(34));
        assert_eq!(rounded[0].index, entries[0].index);
    }
}
