//! variables.rs: Engine parameters with safe defaults and domain checks.
//!
//! Layering (lowest to highest precedence): `Params::default()` → params
//! file (`sd_io`) → CLI flags (`sd_cli`). `validate_domains` runs once after
//! the final layer is applied.

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default display cap (rows, including the remainder row).
pub const DEFAULT_MAX_INCLUDED: usize = 5;
/// Hard upper bound accepted for the display cap.
pub const MAX_INCLUDED_CEILING: usize = 64;
/// Upper bound for display decimals.
pub const MAX_DISPLAY_DIGITS: u32 = 6;
pub const DEFAULT_OTHERS_LABEL: &str = "Others";
pub const DEFAULT_HEADING: &str = "Voting influence distribution";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Params {
    /// Maximum number of rows returned by the summarizer.
    pub max_included: usize,
    /// Decimals kept by display rounding.
    pub display_digits: u32,
    /// Legend label substituted for the remainder bucket.
    pub others_label: String,
    /// Report heading.
    pub heading: String,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_included: DEFAULT_MAX_INCLUDED,
            display_digits: 0,
            others_label: DEFAULT_OTHERS_LABEL.to_string(),
            heading: DEFAULT_HEADING.to_string(),
        }
    }
}

/// Check every parameter against its domain.
pub fn validate_domains(p: &Params) -> Result<(), CoreError> {
    if !(1..=MAX_INCLUDED_CEILING).contains(&p.max_included) {
        return Err(CoreError::DomainOutOfRange("max_included"));
    }
    if p.display_digits > MAX_DISPLAY_DIGITS {
        return Err(CoreError::DomainOutOfRange("display_digits"));
    }
    let label = p.others_label.trim();
    if label.is_empty() || label.chars().count() > 64 {
        return Err(CoreError::DomainOutOfRange("others_label"));
    }
    if p.heading.chars().count() > 200 {
        return Err(CoreError::DomainOutOfRange("heading"));
    }
    Ok(())
}
