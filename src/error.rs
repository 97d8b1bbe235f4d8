//! Error types for brickyard.
//!
//! All errors are strongly typed using thiserror so callers can pattern match
//! on the exact rejection reason. Geometric rejections live in
//! [`PlacementError`] and are always reported in the fixed pipeline order
//! Type → Bounds → Support → Collision.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::geometry::{Axis, GridPosition, Rotation};
use crate::scene::{BrickId, SceneId};

/// Validation errors that occur during input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Rotation {value} is not one of 0, 90, 180, 270")]
    InvalidRotation {
        value: String,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        field: String,
        max_length: usize,
    },

    #[error("Color '{value}' is not a #rrggbb hex color")]
    InvalidColor {
        value: String,
    },

    #[error("Invalid scene format: {reason}")]
    InvalidImportFormat {
        reason: String,
    },

    #[error("Invalid brick type '{type_id}': {reason}")]
    InvalidBrickType {
        type_id: String,
        reason: String,
    },

    #[error("Batch of {actual} bricks exceeds maximum of {max}")]
    BatchTooLarge {
        actual: usize,
        max: usize,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Which geometric check rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementErrorKind {
    /// The type id is not in the catalog.
    UnknownBrickType,
    /// The footprint leaves the building area.
    OutOfBounds,
    /// Neither on the building surface nor resting on another brick.
    Unsupported,
    /// Overlaps another brick or sits in its blockout volume.
    Collision,
}

/// Placement rejections, each echoing the attempted parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("Unknown brick type \"{type_id}\"")]
    UnknownBrickType {
        type_id: String,
        position: GridPosition,
        rotation: Rotation,
    },

    #[error("{type_id} at {position} rotated {rotation}: extends outside the building area on the {axis} axis (size {building_size})")]
    OutOfBounds {
        type_id: String,
        position: GridPosition,
        rotation: Rotation,
        axis: Axis,
        building_size: i32,
    },

    #[error("{type_id} at {position} rotated {rotation}: no support, must rest on the building surface (y=0) or on top of another brick")]
    Unsupported {
        type_id: String,
        position: GridPosition,
        rotation: Rotation,
    },

    #[error("{type_id} at {position} rotated {rotation}: collision, overlaps an existing brick")]
    Collision {
        type_id: String,
        position: GridPosition,
        rotation: Rotation,
        /// The first brick found blocking the candidate.
        blocking: Option<BrickId>,
    },
}

impl PlacementError {
    /// Returns which check produced this rejection.
    #[must_use]
    pub const fn kind(&self) -> PlacementErrorKind {
        match self {
            Self::UnknownBrickType { .. } => PlacementErrorKind::UnknownBrickType,
            Self::OutOfBounds { .. } => PlacementErrorKind::OutOfBounds,
            Self::Unsupported { .. } => PlacementErrorKind::Unsupported,
            Self::Collision { .. } => PlacementErrorKind::Collision,
        }
    }

    /// The type id that was attempted.
    #[must_use]
    pub fn type_id(&self) -> &str {
        match self {
            Self::UnknownBrickType { type_id, .. }
            | Self::OutOfBounds { type_id, .. }
            | Self::Unsupported { type_id, .. }
            | Self::Collision { type_id, .. } => type_id,
        }
    }

    /// The position that was attempted.
    #[must_use]
    pub const fn position(&self) -> GridPosition {
        match self {
            Self::UnknownBrickType { position, .. }
            | Self::OutOfBounds { position, .. }
            | Self::Unsupported { position, .. }
            | Self::Collision { position, .. } => *position,
        }
    }
}

/// Execution errors that occur while applying a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Brick not found: {id}")]
    BrickNotFound {
        id: BrickId,
    },

    #[error("Scene not found: {scene_id}")]
    SceneNotFound {
        scene_id: SceneId,
    },

    #[error("Scene already open: {scene_id}")]
    SceneAlreadyOpen {
        scene_id: SceneId,
    },

    #[error("Scene changed concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        expected: u64,
        actual: u64,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
    },

    #[error("Queue full for scene {scene_id} (capacity {capacity})")]
    QueueFull {
        scene_id: SceneId,
        capacity: usize,
    },

    #[error("Execution path disconnected: {path}")]
    Disconnected {
        path: String,
    },

    #[error("Operation timed out after {duration_ms}ms")]
    Timeout {
        duration_ms: u64,
    },
}

/// Top-level error type for brickyard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrickError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Placement rejected: {0}")]
    Placement(#[from] PlacementError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl BrickError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a placement rejection.
    #[must_use]
    pub const fn is_placement(&self) -> bool {
        matches!(self, Self::Placement(_))
    }

    /// Returns true if this is an execution error.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns the placement rejection kind, if any.
    #[must_use]
    pub const fn placement_kind(&self) -> Option<PlacementErrorKind> {
        match self {
            Self::Placement(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Execution(e) => matches!(
                e,
                ExecutionError::QueueFull { .. }
                    | ExecutionError::Timeout { .. }
                    | ExecutionError::VersionConflict { .. }
            ),
            // The scene may change under a placement, but the same request is
            // not expected to succeed without the caller adjusting it.
            Self::Validation(_) | Self::Placement(_) | Self::Catalog(_) | Self::Internal { .. } => {
                false
            }
        }
    }
}

/// Result type alias for brickyard operations.
pub type BrickResult<T> = Result<T, BrickError>;
