//! ap_io: vote-table loading, limits configuration, canonical JSON and
//! result digests. The allocation crates never touch the filesystem; this
//! crate is the only place that does.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for ap_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors.
    #[error("io/path error: {0}")]
    Path(String),

    /// A malformed line in a vote table (1-based line number).
    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },

    /// JSON serialization/deserialization errors.
    #[error("json error: {0}")]
    Json(String),

    /// Well-formed input that fails validation.
    #[error("invalid: {0}")]
    Invalid(String),
}

/// Result alias returned by every fallible ap_io function.
pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json(e.to_string())
    }
}

pub mod canonical_json;
pub mod config;
pub mod hasher;
pub mod loader;

pub use config::load_limits;
pub use hasher::result_id;
pub use loader::{load_table, parse_table, TableRow, VoteTable};
