//! Domain entities: stakes as loaded, and the numeric projection the
//! summarizer ranks.

use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::ids::ProposalId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One account's committed weight toward one proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct Stake {
    pub proposal_id: ProposalId,
    pub proposal_name: String,
    pub amount: Decimal,
}

impl Stake {
    pub fn new(proposal_id: ProposalId, proposal_name: impl Into<String>, amount: Decimal) -> Self {
        Self { proposal_id, proposal_name: proposal_name.into(), amount }
    }
}

/// Normalized view of a stake stripped of display metadata.
/// `index` is the caller's position of the amount in its input slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightedItem {
    pub index: usize,
    pub amount: Decimal,
}

impl WeightedItem {
    /// Build an item, rejecting negative amounts (never clamped).
    pub fn new(index: usize, amount: Decimal) -> Result<Self, CoreError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CoreError::NegativeAmount);
        }
        Ok(Self { index, amount })
    }
}

/// Project stakes onto their amounts, preserving order (index == position).
pub fn amounts_of(stakes: &[Stake]) -> Vec<Decimal> {
    stakes.iter().map(|s| s.amount).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn weighted_item_rejects_negative() {
        assert_eq!(WeightedItem::new(0, dec!(-1)), Err(CoreError::NegativeAmount));
        assert!(WeightedItem::new(0, dec!(0)).is_ok());
        // -0 is zero, not a violation
        assert!(WeightedItem::new(0, -dec!(0)).is_ok());
    }

    #[test]
    fn amounts_keep_caller_order() {
        let stakes = vec![
            Stake::new("1".parse().unwrap(), "A", dec!(5)),
            Stake::new("2".parse().unwrap(), "B", dec!(7)),
        ];
        assert_eq!(amounts_of(&stakes), vec![dec!(5), dec!(7)]);
    }
}
