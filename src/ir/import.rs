//! Raw scene documents for import.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::geometry::{GridPosition, Rotation};
use crate::scene::BrickId;

/// One brick entry of a foreign scene, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBrick {
    /// Incoming id, kept when it is a UUID not already used.
    #[serde(default)]
    pub id: Option<String>,
    /// Catalog key.
    #[serde(alias = "type_id")]
    pub type_id: String,
    /// Minimum corner.
    pub position: GridPosition,
    /// Rotation, 0° when omitted.
    #[serde(default)]
    pub rotation: Rotation,
    /// Color, the engine default when omitted.
    #[serde(default)]
    pub color: Option<String>,
}

impl RawBrick {
    /// The incoming id, if it parses as a brick id.
    #[must_use]
    pub fn parsed_id(&self) -> Option<BrickId> {
        self.id.as_deref().and_then(BrickId::parse)
    }
}

/// A parsed foreign scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScene {
    /// Scene name.
    pub name: String,
    /// Decodable entries in document order.
    pub bricks: Vec<RawBrick>,
    /// Entries that could not be decoded at all.
    pub undecodable: usize,
}

fn invalid(reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidImportFormat {
        reason: reason.into(),
    }
}

/// Parses a raw scene document.
///
/// The document must be a JSON object with a non-empty string `name` and an
/// array `bricks`. Entries are decoded one by one; an entry that does not
/// decode is counted in `undecodable` instead of failing the import.
///
/// # Errors
/// Returns `InvalidImportFormat` if the document shape is wrong.
pub fn parse_scene(json: &str) -> Result<RawScene, ValidationError> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| invalid(format!("not valid JSON: {e}")))?;

    let Value::Object(mut fields) = document else {
        return Err(invalid(r#"expected { "name": "...", "bricks": [...] }"#));
    };

    let name = match fields.remove("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        _ => return Err(invalid("missing scene name")),
    };

    let Some(Value::Array(entries)) = fields.remove("bricks") else {
        return Err(invalid("missing brick list"));
    };

    let mut bricks = Vec::with_capacity(entries.len());
    let mut undecodable = 0;
    for entry in entries {
        match serde_json::from_value::<RawBrick>(entry) {
            Ok(brick) => bricks.push(brick),
            Err(e) => {
                tracing::debug!(error = %e, "skipping undecodable brick entry");
                undecodable += 1;
            }
        }
    }

    Ok(RawScene {
        name,
        bricks,
        undecodable,
    })
}
