//! Loader: read local JSON inputs (stake file, params file) into typed
//! values for the pipeline. No network I/O.
//!
//! Contract:
//! - inputs are bounded to `MAX_INPUT_BYTES`;
//! - unknown fields are rejected at every level;
//! - decimals are accepted as JSON strings or JSON numbers and parsed
//!   exactly from their textual form (no f64 round trip);
//! - stake order is preserved: a stake's position is its index downstream.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sd_core::rounding::parse_decimal;
use sd_core::{Decimal, Params, ProposalId, Stake};
use serde::Deserialize;
use tracing::debug;

use crate::{looks_like_url_strict, IoError, IoResult};

/// Upper bound on any input file.
pub const MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

// ----------------------------- Public types -----------------------------

/// One account's stakes plus the optional balance and denominator override.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StakeFile {
    pub account: Option<String>,
    pub account_balance: Option<Decimal>,
    pub total: Option<Decimal>,
    pub stakes: Vec<Stake>,
}

// ----------------------------- Wire shapes -----------------------------

/// A decimal as written in the file: a JSON string or a JSON number. With
/// `arbitrary_precision` the number keeps its literal text.
#[derive(Deserialize)]
#[serde(transparent)]
struct RawDecimal(serde_json::Value);

impl RawDecimal {
    fn parse(&self, pointer: &str) -> IoResult<Decimal> {
        let text = match &self.0 {
            serde_json::Value::String(s) => s.trim().to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err(IoError::Json {
                    pointer: pointer.to_string(),
                    msg: format!("expected a decimal string or number, found {other}"),
                })
            }
        };
        parse_decimal(&text).map_err(|e| IoError::Json {
            pointer: pointer.to_string(),
            msg: format!("{e}: {text:?}"),
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStake {
    proposal_id: ProposalId,
    proposal_name: String,
    amount: RawDecimal,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStakeFile {
    #[serde(default)]
    account: Option<String>,
    #[serde(default)]
    account_balance: Option<RawDecimal>,
    #[serde(default)]
    total: Option<RawDecimal>,
    stakes: Vec<RawStake>,
}

// ----------------------------- Loaders -----------------------------

/// Load and parse a stake file.
pub fn load_stake_file(path: &Path) -> IoResult<StakeFile> {
    let bytes = read_bounded(path)?;
    let raw: RawStakeFile = serde_json::from_slice(&bytes)?;

    let account_balance = raw
        .account_balance
        .as_ref()
        .map(|d| d.parse("/account_balance"))
        .transpose()?;
    let total = raw.total.as_ref().map(|d| d.parse("/total")).transpose()?;

    let stakes = raw
        .stakes
        .into_iter()
        .enumerate()
        .map(|(i, rs)| {
            let amount = rs.amount.parse(&format!("/stakes/{i}/amount"))?;
            Ok(Stake::new(rs.proposal_id, rs.proposal_name, amount))
        })
        .collect::<IoResult<Vec<_>>>()?;

    debug!(path = %path.display(), stakes = stakes.len(), "stake file loaded");
    Ok(StakeFile { account: raw.account, account_balance, total, stakes })
}

/// Load a params file; absent fields take their defaults.
/// Domain checks happen in the pipeline, not here.
pub fn load_params(path: &Path) -> IoResult<Params> {
    let bytes = read_bounded(path)?;
    let params: Params = serde_json::from_slice(&bytes)?;
    debug!(path = %path.display(), "params loaded");
    Ok(params)
}

fn read_bounded(path: &Path) -> IoResult<Vec<u8>> {
    let shown = path.to_string_lossy();
    if looks_like_url_strict(&shown) {
        return Err(IoError::Invalid(format!("URL-like paths are not supported: {shown}")));
    }
    let f = File::open(path).map_err(|e| IoError::Path(format!("open {shown}: {e}")))?;
    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Path(format!("read {shown}: {e}")))?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!("{shown} exceeds {MAX_INPUT_BYTES} bytes")));
    }
    Ok(buf)
}
