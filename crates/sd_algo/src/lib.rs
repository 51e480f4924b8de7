// crates/sd_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Pure algorithms over already-decoded numbers. No I/O, no RNG, no shared
//! state: every function here is deterministic and safe to call from any
//! thread.

pub use sd_core::{Decimal, DistributionEntry, EntryIndex, Stake, WeightedItem};

// ----------------------------- Summarizer (public surface) ---------------------------

pub mod summarize;

pub use summarize::{summarize, summarize_f64, summarize_with, SummarizeError, SummarizeOptions};

// ----------------------------- Display rounding --------------------------------------

pub mod display_rounding;

pub use display_rounding::{percentage_list, round_distribution, scale_values_set, RoundedEntry, RoundingError};

// ----------------------------- Aggregation consumers ---------------------------------

pub mod aggregate;

pub use aggregate::{total_active_stake, voting_influence, AggregateError, VotingInfluence};
