//! Determinism utilities: stable total orders for ranking.
//!
//! The summarizer and the display rounding both need the same promise: equal
//! weights never swap places between two runs. Every comparator here is a
//! total order with the input index as the final key.

use core::cmp::Ordering;

use crate::distribution::DistributionEntry;
use crate::entities::WeightedItem;

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for WeightedItem {
    /// Amount ↓, then index ↑.
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        other
            .amount
            .cmp(&self.amount)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl StableOrd for DistributionEntry {
    /// Percentage ↓, then index ↑ (`Others` ranks as -1).
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        other
            .percentage
            .cmp(&self.percentage)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Sort **in place** into canonical ranking order.
#[inline]
pub fn sort_canonical<T: StableOrd>(xs: &mut [T]) {
    xs.sort_by(|a, b| a.stable_cmp(b));
}

/// True iff `xs` is already in canonical order.
pub fn is_canonical<T: StableOrd>(xs: &[T]) -> bool {
    xs.windows(2).all(|w| w[0].stable_cmp(&w[1]) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wi(index: usize, amount: rust_decimal::Decimal) -> WeightedItem {
        WeightedItem { index, amount }
    }

    #[test]
    fn items_rank_by_amount_then_index() {
        let mut v = vec![wi(2, dec!(10)), wi(0, dec!(10)), wi(1, dec!(30))];
        sort_canonical(&mut v);
        let got: Vec<usize> = v.iter().map(|w| w.index).collect();
        assert_eq!(got, vec![1, 0, 2]);
        assert!(is_canonical(&v));
    }

    #[test]
    fn others_wins_equal_percentage_tie() {
        let mut v = vec![
            DistributionEntry::item(0, dec!(25)),
            DistributionEntry::others(dec!(25)),
            DistributionEntry::item(1, dec!(50)),
        ];
        sort_canonical(&mut v);
        assert_eq!(v[0], DistributionEntry::item(1, dec!(50)));
        assert!(v[1].is_others());
        assert_eq!(v[2], DistributionEntry::item(0, dec!(25)));
    }
}
