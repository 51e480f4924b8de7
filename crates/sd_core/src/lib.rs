//! sd_core: Core types, domains, ordering helpers and numeric-precision helpers.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`sd_io`, `sd_algo`, `sd_pipeline`, `sd_report`, `sd_cli`).
//!
//! - Registry tokens: `ProposalId`
//! - Entities: `Stake`, `WeightedItem`
//! - Output unit: `DistributionEntry` with `EntryIndex` (`Others` == -1)
//! - Deterministic ordering helpers (amount ↓, index ↑)
//! - Decimal-first numerics (`rounding`)
//! - `Params` with domain validation (`variables`)
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod determinism;
pub mod distribution;
pub mod entities;
pub mod ids;
pub mod rounding;
pub mod variables;

pub mod errors {
    use thiserror::Error;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Debug, Eq, PartialEq, Error)]
    pub enum CoreError {
        #[error("invalid token")]
        InvalidToken,
        #[error("invalid decimal: {0}")]
        InvalidDecimal(String),
        #[error("non-finite number")]
        NonFinite,
        #[error("negative amount")]
        NegativeAmount,
        #[error("arithmetic overflow")]
        Overflow,
        #[error("division by zero")]
        DivisionByZero,
        #[error("domain out of range: {0}")]
        DomainOutOfRange(&'static str),
    }
}

pub use distribution::{DistributionEntry, EntryIndex};
pub use entities::{Stake, WeightedItem};
pub use errors::CoreError;
pub use ids::ProposalId;
pub use variables::Params;

/// Re-exported so downstream crates agree on a single decimal type.
pub use rust_decimal::Decimal;
