//! sd_io: Local, offline I/O for the stake distribution engine.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - `loader`: stake files and params files (bounded reads, strict shapes).
//! - `canonical_json`: sorted-key compact JSON and atomic file writes.
//!
//! No network access: any `scheme://` path is rejected up front.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for sd_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with a location hint.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Input exceeded a size bound.
    #[error("limit exceeded: {0}")]
    Limit(String),

    /// Generic validation / invariants.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json doesn't keep a pointer; report line/column instead.
        IoError::Json {
            pointer: format!("line {} column {}", e.line(), e.column()),
            msg: e.to_string(),
        }
    }
}

pub mod canonical_json;
pub mod loader;

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}

pub mod prelude {
    pub use crate::{looks_like_url_strict, IoError, IoResult};

    pub use crate::canonical_json::{to_canonical_json_bytes, write_bytes_atomic, write_canonical_file};
    pub use crate::loader::{load_params, load_stake_file, StakeFile, MAX_INPUT_BYTES};
}
