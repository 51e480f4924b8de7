//! Aggregation over an account's stakes: the "my stakes" denominator and the
//! active/inactive split of the account balance.

use sd_core::rounding;
use sd_core::{Decimal, Stake};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("negative stake amount {amount} for proposal {proposal_id}")]
    NegativeStake { proposal_id: String, amount: Decimal },
    #[error("arithmetic overflow while summing stakes")]
    Overflow,
}

/// Account balance split into staked (active) and idle (inactive) weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct VotingInfluence {
    pub total: Decimal,
    pub active: Decimal,
    pub inactive: Decimal,
}

/// Sum of the account's stake amounts.
pub fn total_active_stake(stakes: &[Stake]) -> Result<Decimal, AggregateError> {
    if let Some(s) = stakes.iter().find(|s| rounding::is_negative(s.amount)) {
        return Err(AggregateError::NegativeStake {
            proposal_id: s.proposal_id.to_string(),
            amount: s.amount,
        });
    }
    rounding::checked_sum(stakes.iter().map(|s| s.amount)).map_err(|_| AggregateError::Overflow)
}

/// Inactive = balance − staked when both are known and the balance is
/// non-negative; zero otherwise.
pub fn voting_influence(account_balance: Option<Decimal>, total_staked: Option<Decimal>) -> VotingInfluence {
    let total = account_balance.unwrap_or(Decimal::ZERO);
    let active = total_staked.unwrap_or(Decimal::ZERO);
    let inactive = match (account_balance, total_staked) {
        (Some(balance), Some(staked)) if !rounding::is_negative(balance) => {
            if staked > balance {
                warn!(%balance, %staked, "staked amount exceeds balance, reporting no inactive weight");
                Decimal::ZERO
            } else {
                balance - staked
            }
        }
        _ => Decimal::ZERO,
    };
    VotingInfluence { total, active, inactive }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stake(id: &str, amount: Decimal) -> Stake {
        Stake::new(id.parse().unwrap(), format!("Proposal {id}"), amount)
    }

    #[test]
    fn sums_stakes() {
        let s = vec![stake("1", dec!(1.5)), stake("2", dec!(2.5)), stake("3", dec!(0))];
        assert_eq!(total_active_stake(&s).unwrap(), dec!(4));
        assert_eq!(total_active_stake(&[]).unwrap(), dec!(0));
    }

    #[test]
    fn negative_stake_is_rejected() {
        let s = vec![stake("1", dec!(1)), stake("7", dec!(-1))];
        assert_eq!(
            total_active_stake(&s),
            Err(AggregateError::NegativeStake { proposal_id: "7".into(), amount: dec!(-1) })
        );
    }

    #[test]
    fn influence_split() {
        let vi = voting_influence(Some(dec!(100)), Some(dec!(35)));
        assert_eq!(vi, VotingInfluence { total: dec!(100), active: dec!(35), inactive: dec!(65) });
    }

    #[test]
    fn unknown_parts_give_zero_inactive() {
        assert_eq!(voting_influence(None, Some(dec!(5))).inactive, dec!(0));
        assert_eq!(voting_influence(Some(dec!(5)), None).inactive, dec!(0));
        assert_eq!(voting_influence(Some(dec!(-1)), Some(dec!(0))).inactive, dec!(0));
        assert_eq!(voting_influence(Some(dec!(5)), Some(dec!(9))).inactive, dec!(0));
    }
}
