//! Brick instances and their identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{GridPosition, Rotation};

/// Globally unique brick identifier.
///
/// Assigned when a brick is placed and never changed afterwards.
///
/// # Examples
///
/// ```
/// use brickyard::BrickId;
///
/// let id = BrickId::new();
/// assert!(!id.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrickId(Uuid);

impl BrickId {
    /// Creates a new random brick ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a brick ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns true if this is a nil (all zeros) UUID.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Creates a nil brick ID (for testing or sentinel values).
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Parses an id from its hyphenated string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for BrickId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BrickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for BrickId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A placed brick.
///
/// `id` and `type_id` never change after placement; move, rotate and paint
/// only touch `position`, `rotation` and `color`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrickInstance {
    /// Unique id.
    pub id: BrickId,
    /// Catalog key of the brick's type.
    #[serde(alias = "type_id")]
    pub type_id: String,
    /// Minimum corner in grid units.
    pub position: GridPosition,
    /// Quarter-turn rotation about Y.
    #[serde(default)]
    pub rotation: Rotation,
    /// Display color, opaque to the placement rules.
    pub color: String,
}

impl BrickInstance {
    /// Creates an instance with a fresh id.
    #[must_use]
    pub fn new(
        type_id: impl Into<String>,
        position: GridPosition,
        rotation: Rotation,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: BrickId::new(),
            type_id: type_id.into(),
            position,
            rotation,
            color: color.into(),
        }
    }

    /// Short human description, e.g. `brick_2x4 at (0, 3, 0)`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} at {}", self.type_id, self.position)
    }
}
