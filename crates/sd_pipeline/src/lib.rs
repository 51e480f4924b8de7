//! sd_pipeline: deterministic pipeline surface
//! (load → validate → aggregate → summarize → round → label → build report).
//!
//! This crate stays free of output I/O: it reads inputs through `sd_io`,
//! delegates arithmetic to `sd_algo`, and returns a typed
//! `DistributionReport` for `sd_report` / `sd_cli` to serialize.

#![forbid(unsafe_code)]

use std::path::Path;

use sd_algo::{total_active_stake, voting_influence, AggregateError, RoundingError, SummarizeError, VotingInfluence};
use sd_core::{Decimal, Params};
use sd_io::loader::{self, StakeFile};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod label;
pub mod validate;

pub use label::{displayed_stakes, label_rows, LegendRow};
pub use validate::{EntityRef, Severity, ValidationIssue, ValidationReport};

/// Engine identifiers echoed into every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
}

/// Explicit run context: loaded stakes plus the final layered params.
#[derive(Debug, Clone)]
pub struct PipelineCtx {
    pub stakes: StakeFile,
    pub params: Params,
    pub engine_meta: EngineMeta,
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("io: {0}")]
    Io(#[from] sd_io::IoError),
    #[error("validation failed: {0}")]
    Validation(ValidationReport),
    #[error("summarize: {0}")]
    Summarize(#[from] SummarizeError),
    #[error("display rounding: {0}")]
    Rounding(#[from] RoundingError),
    #[error("aggregate: {0}")]
    Aggregate(#[from] AggregateError),
    #[error("label: {0}")]
    Label(String),
}

// ---------------------------- Report document ----------------------------

/// Balance breakdown shown next to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InfluenceView {
    pub total: Decimal,
    pub active: Decimal,
    pub inactive: Decimal,
}

impl From<VotingInfluence> for InfluenceView {
    fn from(v: VotingInfluence) -> Self {
        Self { total: v.total, active: v.active, inactive: v.inactive }
    }
}

/// Everything a renderer needs; fields are already ranked and rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionReport {
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Denominator actually used (explicit total, else the staked sum).
    pub total: Decimal,
    /// `None` when the denominator is zero and the section is hidden.
    pub rows: Option<Vec<LegendRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influence: Option<InfluenceView>,
    /// Proposals with a non-zero stake.
    pub proposals_count: usize,
    pub display_digits: u32,
    pub engine: EngineMeta,
}

// -------------------------------------- Public API --------------------------------------

/// Run the pipeline over a prepared context.
pub fn run(ctx: PipelineCtx) -> Result<DistributionReport, PipelineError> {
    let PipelineCtx { stakes, params, engine_meta } = ctx;

    // --- VALIDATE ---
    let report = validate::validate(&stakes, &params);
    for w in report.warnings() {
        warn!(code = w.code, at = %w.where_, "{}", w.message);
    }
    if !report.pass {
        return Err(PipelineError::Validation(report));
    }

    // --- AGGREGATE ---
    let active = total_active_stake(&stakes.stakes)?;
    let total = stakes.total.unwrap_or(active);
    debug!(%active, %total, explicit = stakes.total.is_some(), "denominator chosen");

    // --- SUMMARIZE → ROUND → LABEL ---
    let rows = label::displayed_stakes(&stakes.stakes, total, &params)?;

    // --- INFLUENCE ---
    let influence = stakes
        .account_balance
        .map(|balance| InfluenceView::from(voting_influence(Some(balance), Some(active))));

    let proposals_count = stakes.stakes.iter().filter(|s| !s.amount.is_zero()).count();
    info!(
        proposals = proposals_count,
        rows = rows.as_ref().map_or(0, Vec::len),
        "distribution built"
    );

    Ok(DistributionReport {
        heading: params.heading.clone(),
        account: stakes.account,
        total,
        rows,
        influence,
        proposals_count,
        display_digits: params.display_digits,
        engine: engine_meta,
    })
}

/// Load a stake file and an optional params file into a context.
/// Callers layer CLI overrides onto `ctx.params` / `ctx.stakes.total` before `run`.
pub fn load_ctx(stakes_path: &Path, params_path: Option<&Path>) -> Result<PipelineCtx, PipelineError> {
    let stakes = loader::load_stake_file(stakes_path)?;
    let params = match params_path {
        Some(p) => loader::load_params(p)?,
        None => Params::default(),
    };
    Ok(PipelineCtx { stakes, params, engine_meta: engine_identifiers() })
}

/// Validate only; never summarizes.
pub fn validate_ctx(ctx: &PipelineCtx) -> ValidationReport {
    validate::validate(&ctx.stakes, &ctx.params)
}

/// Engine identifiers for reports.
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: "sd".to_string(),
        name: "sd_engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
