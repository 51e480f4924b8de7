//! sd_report: offline renderers for a `DistributionReport` (JSON / HTML).
//!
//! Determinism rules:
//! - No network, no I/O here. Callers write the returned values.
//! - Percent strings are formatted from decimals, never through floats.
//! - Stable section order and field names.

#![deny(unsafe_code)]

use sd_core::{Decimal, EntryIndex};
use sd_pipeline::DistributionReport;
use thiserror::Error;

#[cfg(feature = "render_html")]
pub mod render_html;
#[cfg(feature = "render_json")]
pub mod render_json;

#[cfg(feature = "render_html")]
pub use render_html::render_html;
#[cfg(feature = "render_json")]
pub use render_json::render_json;

// ===== Errors =====

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// The report breaks an invariant the renderers rely on.
    #[error("inconsistent report: {0}")]
    Inconsistent(&'static str),
}

/// Checks run before rendering: a report that fails them was not built
/// by the pipeline and would draw a misleading chart.
pub fn check_report(r: &DistributionReport) -> Result<(), ReportError> {
    let Some(rows) = r.rows.as_ref() else { return Ok(()) };
    if rows.iter().filter(|row| row.index == EntryIndex::Others).count() > 1 {
        return Err(ReportError::Inconsistent("more than one remainder row"));
    }
    if rows.is_empty() {
        return Ok(());
    }
    let hundred = Decimal::ONE_HUNDRED;
    if rows.iter().map(|row| row.percentage).sum::<Decimal>() != hundred {
        return Err(ReportError::Inconsistent("percentages do not sum to 100"));
    }
    if rows.iter().map(|row| row.display_percentage).sum::<Decimal>() != hundred {
        return Err(ReportError::Inconsistent("display percentages do not sum to 100"));
    }
    if rows.iter().any(|row| row.percentage.is_sign_negative() && !row.percentage.is_zero()) {
        return Err(ReportError::Inconsistent("negative percentage"));
    }
    Ok(())
}

// ===== Helpers (pure; no floats) =====

/// Fixed-point text with exactly `digits` decimals.
pub fn fmt_fixed(v: Decimal, digits: u32) -> String {
    let mut r = v.round_dp(digits);
    r.rescale(digits);
    r.to_string()
}

/// Token amount with a narrow no-break space (U+202F) every three integer digits.
pub fn fmt_amount(v: Decimal) -> String {
    let text = v.normalize().to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 * 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('\u{202F}');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fixed_pads_and_rounds() {
        assert_eq!(fmt_fixed(dec!(34), 0), "34");
        assert_eq!(fmt_fixed(dec!(33.3), 2), "33.30");
        assert_eq!(fmt_fixed(dec!(12.5), 0), "12");
        assert_eq!(fmt_fixed(dec!(0), 1), "0.0");
    }

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(fmt_amount(dec!(0)), "0");
        assert_eq!(fmt_amount(dec!(999)), "999");
        assert_eq!(fmt_amount(dec!(1000)), "1\u{202F}000");
        assert_eq!(fmt_amount(dec!(1234567.500)), "1\u{202F}234\u{202F}567.5");
        assert_eq!(fmt_amount(dec!(-12345)), "-12\u{202F}345");
    }
}
