//! LABEL: turn ranked, rounded distribution rows into legend rows.
//!
//! Items resolve their stake by index; the remainder bucket gets the
//! configured label, no identifier and is never navigable.

use sd_algo::{round_distribution, summarize, RoundedEntry};
use sd_core::{entities::amounts_of, Decimal, EntryIndex, Params, ProposalId, Stake};
use serde::Serialize;

use crate::PipelineError;

/// One row of the chart legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendRow {
    pub index: EntryIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<ProposalId>,
    pub proposal_name: String,
    pub percentage: Decimal,
    pub display_percentage: Decimal,
    pub navigable: bool,
}

/// Label rounded rows against the stakes they were computed from.
pub fn label_rows(
    rows: &[RoundedEntry],
    stakes: &[Stake],
    params: &Params,
) -> Result<Vec<LegendRow>, PipelineError> {
    rows.iter()
        .map(|r| match r.index {
            EntryIndex::Others => Ok(LegendRow {
                index: r.index,
                proposal_id: None,
                proposal_name: params.others_label.clone(),
                percentage: r.percentage,
                display_percentage: r.display,
                navigable: false,
            }),
            EntryIndex::Item(i) => {
                let s = stakes.get(i).ok_or(PipelineError::Label(format!(
                    "row index {i} out of range for {} stakes",
                    stakes.len()
                )))?;
                Ok(LegendRow {
                    index: r.index,
                    proposal_id: Some(s.proposal_id.clone()),
                    proposal_name: s.proposal_name.clone(),
                    percentage: r.percentage,
                    display_percentage: r.display,
                    navigable: true,
                })
            }
        })
        .collect()
}

/// Summarize, round and label `stakes` against `total`.
/// `None` when `total` is zero: the dashboard hides the section entirely.
pub fn displayed_stakes(
    stakes: &[Stake],
    total: Decimal,
    params: &Params,
) -> Result<Option<Vec<LegendRow>>, PipelineError> {
    if total.is_zero() {
        return Ok(None);
    }
    let entries = summarize(&amounts_of(stakes), total, params.max_included)?;
    let rounded = round_distribution(&entries, params.display_digits)?;
    label_rows(&rounded, stakes, params).map(Some)
}
