//! Distribution summarizer: weighted amounts → bounded, percentage-labeled
//! distribution with an aggregated `Others` bucket.
//!
//! Contract:
//! - Percentages are `amount * 100 / total` against the **supplied** total;
//!   the total is never re-derived from the amounts (see `summarize_with` for
//!   the defaulting entry point).
//! - Ranking: amount ↓, then input index ↑. Items whose percentage is zero
//!   at `PERCENT_DP` digits are dropped before the cap is applied.
//! - At most `max_included` rows. When more non-zero items exist, the top
//!   `max_included - 1` stay and the rest fold into one `Others` row.
//! - Output is ranked by percentage ↓ then index ↑ (`Others` == -1); the
//!   remainder row is not pinned to the end.
//! - The `Others` row carries exactly the share of the folded amounts.
//! - The returned percentages sum to exactly 100: the difference (precision
//!   dust, plus the idle share when `total` exceeds the amounts) is credited
//!   to the largest individual row, then the rows are re-ranked. Only when the
//!   `Others` row is the whole distribution (`max_included == 1`) does it
//!   take the difference itself.
//! - `total` below the sum of the amounts is rejected (`TotalBelowSum`), so
//!   the difference is never negative.
//! - Empty amounts, all-zero amounts, or a zero total → empty output.
//!
//! Determinism:
//! - No RNG, no hashing containers; identical inputs give identical outputs.
//! - Percentages are truncated to `PERCENT_DP` digits so sums are exact.

use sd_core::determinism::sort_canonical;
use sd_core::rounding::{self, HUNDRED};
use sd_core::{CoreError, Decimal, DistributionEntry, WeightedItem};
use thiserror::Error;
use tracing::{debug, trace};

/// Contract violations. Degenerate input is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizeError {
    #[error("max_included must be at least 1")]
    ZeroCap,
    #[error("negative amount {amount} at index {index}")]
    NegativeAmount { index: usize, amount: Decimal },
    #[error("negative total {0}")]
    NegativeTotal(Decimal),
    #[error("non-finite amount at index {index}")]
    NonFiniteAmount { index: usize },
    #[error("non-finite total")]
    NonFiniteTotal,
    #[error("sum of amounts {sum} exceeds total {total}")]
    TotalBelowSum { sum: Decimal, total: Decimal },
    #[error("arithmetic overflow")]
    Overflow,
}

impl From<CoreError> for SummarizeError {
    fn from(_: CoreError) -> Self {
        // Only overflow can come out of the checked helpers once inputs are validated.
        SummarizeError::Overflow
    }
}

/// Options for [`summarize_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummarizeOptions {
    /// Denominator; `None` means the sum of the amounts.
    pub total: Option<Decimal>,
    pub max_included: usize,
}

impl SummarizeOptions {
    pub fn new(max_included: usize) -> Self {
        Self { total: None, max_included }
    }

    pub fn with_total(mut self, total: Decimal) -> Self {
        self.total = Some(total);
        self
    }
}

/// Summarize `amounts` against `total`, keeping at most `max_included` rows.
pub fn summarize(
    amounts: &[Decimal],
    total: Decimal,
    max_included: usize,
) -> Result<Vec<DistributionEntry>, SummarizeError> {
    if max_included == 0 {
        return Err(SummarizeError::ZeroCap);
    }
    for (index, &amount) in amounts.iter().enumerate() {
        if rounding::is_negative(amount) {
            return Err(SummarizeError::NegativeAmount { index, amount });
        }
    }
    if rounding::is_negative(total) {
        return Err(SummarizeError::NegativeTotal(total));
    }
    if amounts.is_empty() || total.is_zero() {
        debug!(items = amounts.len(), %total, "degenerate input, empty distribution");
        return Ok(Vec::new());
    }

    let sum = rounding::checked_sum(amounts.iter().copied())?;
    if sum > total {
        return Err(SummarizeError::TotalBelowSum { sum, total });
    }

    let mut items: Vec<WeightedItem> = Vec::with_capacity(amounts.len());
    for (index, &amount) in amounts.iter().enumerate() {
        if amount.is_zero() || percent(amount, total)?.is_zero() {
            continue;
        }
        items.push(WeightedItem { index, amount });
    }
    if items.is_empty() {
        debug!(items = amounts.len(), "no item with a non-zero share, empty distribution");
        return Ok(Vec::new());
    }
    sort_canonical(&mut items);

    let kept_len = if items.len() <= max_included { items.len() } else { max_included - 1 };
    let (kept, folded) = items.split_at(kept_len);

    let mut out: Vec<DistributionEntry> = Vec::with_capacity(kept.len() + 1);
    for it in kept {
        out.push(DistributionEntry::item(it.index, percent(it.amount, total)?));
    }
    if !folded.is_empty() {
        let rest = rounding::checked_sum(folded.iter().map(|w| w.amount))?;
        debug!(folded = folded.len(), %rest, "folding items into remainder bucket");
        out.push(DistributionEntry::others(percent(rest, total)?));
    }

    sort_canonical(&mut out);
    credit_leftover(&mut out)?;
    Ok(out)
}

/// Like [`summarize`], with the total defaulting to the sum of the amounts.
pub fn summarize_with(
    amounts: &[Decimal],
    opts: &SummarizeOptions,
) -> Result<Vec<DistributionEntry>, SummarizeError> {
    let total = match opts.total {
        Some(t) => t,
        None => {
            // Report a negative amount before it can skew the derived total.
            if let Some((index, &amount)) =
                amounts.iter().enumerate().find(|(_, a)| rounding::is_negative(**a))
            {
                return Err(SummarizeError::NegativeAmount { index, amount });
            }
            rounding::checked_sum(amounts.iter().copied())?
        }
    };
    summarize(amounts, total, opts.max_included)
}

/// Float entry point; rejects NaN and infinities before any arithmetic.
pub fn summarize_f64(
    amounts: &[f64],
    total: f64,
    max_included: usize,
) -> Result<Vec<DistributionEntry>, SummarizeError> {
    let mut converted = Vec::with_capacity(amounts.len());
    for (index, &a) in amounts.iter().enumerate() {
        let d = rounding::decimal_from_f64(a).map_err(|e| match e {
            CoreError::NonFinite => SummarizeError::NonFiniteAmount { index },
            _ => SummarizeError::Overflow,
        })?;
        converted.push(d);
    }
    let total = rounding::decimal_from_f64(total).map_err(|e| match e {
        CoreError::NonFinite => SummarizeError::NonFiniteTotal,
        _ => SummarizeError::Overflow,
    })?;
    summarize(&converted, total, max_included)
}

#[inline]
fn percent(amount: Decimal, total: Decimal) -> Result<Decimal, SummarizeError> {
    Ok(rounding::quantize_percent(rounding::percent_of(amount, total)?))
}

/// Credit `100 - Σ` to the largest individual row and re-rank.
fn credit_leftover(out: &mut [DistributionEntry]) -> Result<(), SummarizeError> {
    let sum = rounding::checked_sum(out.iter().map(|e| e.percentage))?;
    let leftover = HUNDRED.checked_sub(sum).ok_or(SummarizeError::Overflow)?;
    if leftover.is_zero() {
        return Ok(());
    }
    // `out` is ranked, so the first item row is the largest one.
    let target = match out.iter().position(|e| !e.is_others()) {
        Some(i) => i,
        None if !out.is_empty() => 0,
        None => return Ok(()),
    };
    trace!(%leftover, index = %out[target].index, "crediting leftover");
    out[target].percentage = out[target]
        .percentage
        .checked_add(leftover)
        .ok_or(SummarizeError::Overflow)?;
    sort_canonical(out);
    debug_assert_eq!(
        rounding::checked_sum(out.iter().map(|e| e.percentage)).ok(),
        Some(HUNDRED)
    );
    Ok(())
}
