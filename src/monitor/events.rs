//! Scene change events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scene::BrickId;

/// Unique identifier for a change-feed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new random subscription id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which mutation produced an event.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneEventKind {
    Placed,
    Moved,
    Rotated,
    Painted,
    Removed,
    Cleared,
    Imported,
    Renamed,
}

/// One committed mutation, published once per version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEvent {
    /// Scene version after the commit.
    pub version: u64,
    /// Mutation kind.
    pub kind: SceneEventKind,
    /// Bricks directly touched by the mutation.
    pub brick_ids: Vec<BrickId>,
    /// Bricks removed by the cascade that followed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cascade_removed: Vec<BrickId>,
    /// Commit time.
    pub committed_at: DateTime<Utc>,
}

impl SceneEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(version: u64, kind: SceneEventKind, brick_ids: Vec<BrickId>) -> Self {
        Self {
            version,
            kind,
            brick_ids,
            cascade_removed: Vec::new(),
            committed_at: Utc::now(),
        }
    }

    /// Attaches cascade removals.
    #[must_use]
    pub fn with_cascade(mut self, cascade_removed: Vec<BrickId>) -> Self {
        self.cascade_removed = cascade_removed;
        self
    }
}
