//! IR serialization helpers.
//!
//! Centralizes the JSON helpers used by embedders and keeps formatting stable.

use crate::error::{BrickError, BrickResult};
use crate::ir::operations::MutationRequest;

/// Serialize a request to pretty JSON.
///
/// # Errors
/// Returns `Internal` if serialization fails.
pub fn to_json_pretty(request: &MutationRequest) -> BrickResult<String> {
    serde_json::to_string_pretty(request)
        .map_err(|e| BrickError::internal(format!("serialize request: {e}")))
}

/// Deserialize a request from JSON.
///
/// Callers should then invoke `request.validate(..)` before executing.
///
/// # Errors
/// Returns `Internal` if the JSON does not describe a request.
pub fn from_json(s: &str) -> BrickResult<MutationRequest> {
    serde_json::from_str::<MutationRequest>(s)
        .map_err(|e| BrickError::internal(format!("deserialize request: {e}")))
}
