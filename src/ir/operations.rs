//! Mutation request definitions and payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{GridPosition, Rotation};
use crate::scene::BrickId;

/// The envelope every scene mutation travels in.
///
/// Carries a protocol version, a request id for correlation, and the
/// creation timestamp alongside the mutation itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRequest {
    /// Protocol version (e.g., "1.0").
    pub version: String,

    /// Unique identifier for this request.
    pub request_id: Uuid,

    /// When this request was created.
    pub timestamp: DateTime<Utc>,

    /// The mutation to apply.
    pub mutation: Mutation,
}

impl MutationRequest {
    /// Current protocol version.
    pub const CURRENT_VERSION: &'static str = "1.0";

    /// Wraps a mutation in a new envelope.
    #[must_use]
    pub fn new(mutation: Mutation) -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            mutation,
        }
    }

    /// Sets a custom request ID (useful for correlation).
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }
}

/// All supported scene mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "payload", rename_all = "snake_case")]
pub enum Mutation {
    /// Add one brick.
    Place(PlacePayload),

    /// Move a brick to a new position, keeping its rotation.
    Move(MovePayload),

    /// Turn a brick in place.
    Rotate(RotatePayload),

    /// Change a brick's color.
    Paint(PaintPayload),

    /// Delete a brick.
    Remove(RemovePayload),

    /// Delete every brick.
    Clear,

    /// Replace the scene with a re-validated foreign scene.
    Import(ImportPayload),

    /// Add several bricks, skipping the ones that fail.
    PlaceBatch(BatchPayload),

    /// Change the scene name.
    Rename(RenamePayload),
}

impl Mutation {
    /// Short name of the mutation, as used in the `op` tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Place(_) => "place",
            Self::Move(_) => "move",
            Self::Rotate(_) => "rotate",
            Self::Paint(_) => "paint",
            Self::Remove(_) => "remove",
            Self::Clear => "clear",
            Self::Import(_) => "import",
            Self::PlaceBatch(_) => "place_batch",
            Self::Rename(_) => "rename",
        }
    }
}

/// Payload for PLACE, also used for each batch entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacePayload {
    /// Catalog key of the brick type.
    #[serde(alias = "typeId")]
    pub type_id: String,

    /// Minimum corner in grid units.
    pub position: GridPosition,

    /// Rotation, 0° when omitted.
    #[serde(default)]
    pub rotation: Rotation,

    /// `#rrggbb` color; the engine default when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload for MOVE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePayload {
    /// Brick to move.
    #[serde(alias = "brickId")]
    pub brick_id: BrickId,

    /// New minimum corner.
    pub position: GridPosition,
}

/// Payload for ROTATE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatePayload {
    /// Brick to rotate.
    #[serde(alias = "brickId")]
    pub brick_id: BrickId,

    /// New absolute rotation.
    pub rotation: Rotation,
}

/// Payload for PAINT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintPayload {
    /// Brick to paint.
    #[serde(alias = "brickId")]
    pub brick_id: BrickId,

    /// New `#rrggbb` color.
    pub color: String,
}

/// Payload for REMOVE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovePayload {
    /// Brick to remove.
    #[serde(alias = "brickId")]
    pub brick_id: BrickId,
}

/// Payload for IMPORT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPayload {
    /// Raw scene document, `{ "name": ..., "bricks": [...] }`.
    #[serde(alias = "sceneJson")]
    pub scene_json: String,
}

/// Payload for PLACE_BATCH.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPayload {
    /// Candidates in submission order.
    pub bricks: Vec<PlacePayload>,
}

/// Payload for RENAME.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePayload {
    /// New scene name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_tagging() {
        let m = Mutation::Place(PlacePayload {
            type_id: "brick_2x4".to_string(),
            position: GridPosition::new(0, 0, 0),
            rotation: Rotation::Deg90,
            color: None,
        });
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["op"], "place");
        assert_eq!(v["payload"]["rotation"], 90);
        assert!(v["payload"].get("color").is_none());

        let clear = serde_json::to_value(&Mutation::Clear).unwrap();
        assert_eq!(clear["op"], "clear");
        let back: Mutation = serde_json::from_str(r#"{"op":"clear"}"#).unwrap();
        assert_eq!(back, Mutation::Clear);
    }

    #[test]
    fn test_place_accepts_wire_spellings() {
        let json = r#"{
            "op": "place",
            "payload": {"typeId": "plate_2x2", "position": {"x": 1, "y": 0, "z": 2}, "rotation": "180"}
        }"#;
        let m: Mutation = serde_json::from_str(json).unwrap();
        let Mutation::Place(p) = m else {
            panic!("expected place");
        };
        assert_eq!(p.type_id, "plate_2x2");
        assert_eq!(p.rotation, Rotation::Deg180);
        assert_eq!(p.color, None);
    }

    #[test]
    fn test_rotate_rejects_bad_rotation() {
        let json = format!(
            r#"{{"op":"rotate","payload":{{"brick_id":"{}","rotation":45}}}}"#,
            BrickId::nil()
        );
        assert!(serde_json::from_str::<Mutation>(&json).is_err());
    }

    #[test]
    fn test_request_envelope() {
        let req = MutationRequest::new(Mutation::Clear).with_request_id(Uuid::nil());
        assert_eq!(req.version, MutationRequest::CURRENT_VERSION);
        assert_eq!(req.request_id, Uuid::nil());
        assert_eq!(req.mutation.name(), "clear");
    }
}
