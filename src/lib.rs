//! # Brickyard - Placement Validation for Brick Scenes
//!
//! Brickyard decides whether grid-aligned bricks may be placed, moved, rotated
//! or removed in a fixed-size building area, and keeps every committed scene
//! physically consistent.
//!
//! ## Core Concepts
//!
//! - **Type catalog**: append-only registry of brick shapes (plan size, height, blockout zones)
//! - **Footprint**: the physical contact boxes of a placed brick, an L for corner types
//! - **Placement checks**: Type → Bounds → Support → Collision, first failure wins
//! - **Cascade removal**: bricks that lose support are removed in the same commit
//!
//! ## Usage
//!
//! ```rust
//! use brickyard::{GridPosition, Rotation, SceneEngine};
//!
//! let engine = SceneEngine::in_memory();
//! let base = engine
//!     .place("brick_2x4", GridPosition::new(0, 0, 0), Rotation::Deg0, None)?
//!     .brick()
//!     .cloned()
//!     .expect("placed");
//! engine.place("plate_2x2", GridPosition::new(0, 3, 0), Rotation::Deg0, None)?;
//!
//! // Removing the base drops the plate resting on it.
//! let removed = engine.remove(base.id)?;
//! assert_eq!(removed.cascade_removed().len(), 1);
//! # Ok::<(), brickyard::BrickError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod catalog;
pub mod config;
pub mod error;
pub mod geometry;
pub mod scene;

// Validation and state
pub mod placement;
pub mod storage;

// Requests, execution and monitoring
pub mod engine;
pub mod ir;
pub mod monitor;
pub mod operations;

// Re-export primary types at crate root for convenience
pub use catalog::{BlockoutZone, BrickCategory, BrickTypeDefinition, InMemoryCatalog, TypeCatalog};
pub use config::EngineConfig;
pub use error::{
    BrickError, BrickResult, ExecutionError, PlacementError, PlacementErrorKind, ValidationError,
};
pub use geometry::{Aabb, Axis, FootprintSummary, GridPosition, Rotation};
pub use scene::{BrickId, BrickInstance, Scene, SceneId, SceneSnapshot, SceneSummary};

pub use engine::{
    BatchOutcome, BatchProgress, CancellationToken, EngineResponse, ExecutionHandle, SceneEngine,
    SceneRuntime,
};
pub use ir::{Mutation, MutationRequest, PlacePayload};
pub use monitor::{SceneEvent, SceneEventKind, SceneEventStream};
pub use operations::{BatchBuilder, PlaceBuilder};
pub use storage::{InMemorySceneStore, SceneStore, StorageError};
