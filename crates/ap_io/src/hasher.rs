//! Deterministic digests of canonical artifacts.
//!
//! - Hex digests are lowercase.
//! - `RES:` ids hash the canonical JSON of an `Apportionment`; two runs with
//!   identical inputs produce identical ids.

use ap_core::Apportionment;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::canonical_json_bytes;
use crate::IoResult;

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over the canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(sha256_hex(&canonical_json_bytes(value)?))
}

/// `RES:<sha256>` for one allocation result.
pub fn result_id(result: &Apportionment) -> IoResult<String> {
    Ok(format!("RES:{}", sha256_canonical(result)?))
}
