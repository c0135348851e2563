//! JSON renderer: canonical bytes (sorted keys, compact), so two renders of the
//! same model are byte-identical.

use ap_io::canonical_json::canonical_json_string;
use serde::Serialize;

use crate::ReportError;

/// Canonical JSON of a comparison table or a single apportionment.
pub fn render_json<T: Serialize>(model: &T) -> Result<String, ReportError> {
    Ok(canonical_json_string(model)?)
}
