//! Engine limits from JSON. Any subset of fields may be given; the rest keep
//! their defaults. Unknown fields are rejected.

use std::fs;
use std::path::Path;

use ap_core::Limits;

use crate::{IoError, IoResult};

pub fn load_limits(path: &Path) -> IoResult<Limits> {
    let text = fs::read_to_string(path)
        .map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    parse_limits(&text)
}

pub fn parse_limits(text: &str) -> IoResult<Limits> {
    let limits: Limits = serde_json::from_str(text)?;
    limits.validate().map_err(|e| IoError::Invalid(e.to_string()))?;
    Ok(limits)
}
