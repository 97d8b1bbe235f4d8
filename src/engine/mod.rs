//! Scene engine: the mutation coordinator.
//!
//! [`SceneEngine`] is the only component that changes a scene. Each mutation
//! loads the scene from the injected [`SceneStore`], validates against that
//! snapshot, and commits with a compare-and-swap on the version it loaded.
//! Exactly one version bump per committed mutation, cascade removals included.

pub mod runtime;

mod batch;
mod cascade;

use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::{InMemoryCatalog, TypeCatalog};
use crate::config::EngineConfig;
use crate::error::{BrickError, BrickResult, ExecutionError};
use crate::geometry::{world_aabb, FootprintSummary, GridPosition, Rotation};
use crate::ir::{
    is_hex_color, parse_scene, ImportPayload, Mutation, MutationRequest, PaintPayload,
    PlacePayload, RenamePayload,
};
use crate::monitor::{ChangeFeed, SceneEvent, SceneEventKind, SceneEventStream};
use crate::placement::{validate_candidate, Candidate, PlacedBrick, SceneView, Validated};
use crate::scene::{
    BrickId, BrickInstance, BrickView, Scene, SceneDocument, SceneSnapshot, SceneSummary,
};
use crate::storage::{InMemorySceneStore, SceneStore, StorageError};

pub use batch::{BatchFailure, BatchOutcome, BatchProgress, CancellationToken};
pub use cascade::cascade_unsupported;
pub use runtime::{ExecutionHandle, SceneRuntime};

/// Result of executing a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineResponse {
    /// Result of a PLACE.
    Placed {
        /// The new brick.
        brick: BrickInstance,
        /// Its world footprint.
        footprint: FootprintSummary,
        /// Scene version after the commit.
        version: u64,
    },

    /// Result of a MOVE.
    Moved {
        /// The brick at its new position.
        brick: BrickInstance,
        /// Its world footprint.
        footprint: FootprintSummary,
        /// Bricks removed because they lost support.
        cascade_removed: Vec<BrickId>,
        /// Scene version after the commit.
        version: u64,
    },

    /// Result of a ROTATE.
    Rotated {
        /// The brick at its new rotation.
        brick: BrickInstance,
        /// Its world footprint.
        footprint: FootprintSummary,
        /// Bricks removed because they lost support.
        cascade_removed: Vec<BrickId>,
        /// Scene version after the commit.
        version: u64,
    },

    /// Result of a PAINT.
    Painted {
        /// The repainted brick.
        brick: BrickInstance,
        /// Scene version after the commit.
        version: u64,
    },

    /// Result of a REMOVE.
    Removed {
        /// The removed brick.
        removed: BrickInstance,
        /// Bricks removed because they lost support.
        cascade_removed: Vec<BrickId>,
        /// Scene version after the commit.
        version: u64,
    },

    /// Result of a CLEAR.
    Cleared {
        /// Number of bricks removed.
        removed_count: usize,
        /// Scene version after the commit.
        version: u64,
    },

    /// Result of an IMPORT.
    Imported {
        /// Name of the imported scene.
        name: String,
        /// Bricks that passed validation.
        committed: usize,
        /// Entries dropped as undecodable or invalid.
        dropped: usize,
        /// Scene version after the commit.
        version: u64,
    },

    /// Result of a PLACE_BATCH.
    Batch(BatchOutcome),

    /// Result of a RENAME.
    Renamed {
        /// The new name.
        name: String,
        /// Scene version after the commit.
        version: u64,
    },
}

impl EngineResponse {
    /// Scene version after the mutation.
    #[must_use]
    pub const fn version(&self) -> u64 {
        match self {
            Self::Placed { version, .. }
            | Self::Moved { version, .. }
            | Self::Rotated { version, .. }
            | Self::Painted { version, .. }
            | Self::Removed { version, .. }
            | Self::Cleared { version, .. }
            | Self::Imported { version, .. }
            | Self::Renamed { version, .. } => *version,
            Self::Batch(outcome) => outcome.version,
        }
    }

    /// The brick a single-brick mutation produced or touched.
    #[must_use]
    pub const fn brick(&self) -> Option<&BrickInstance> {
        match self {
            Self::Placed { brick, .. }
            | Self::Moved { brick, .. }
            | Self::Rotated { brick, .. }
            | Self::Painted { brick, .. } => Some(brick),
            Self::Removed { removed, .. } => Some(removed),
            Self::Cleared { .. } | Self::Imported { .. } | Self::Batch(_) | Self::Renamed { .. } => {
                None
            }
        }
    }

    /// Bricks removed by the cascade that followed the mutation.
    #[must_use]
    pub fn cascade_removed(&self) -> &[BrickId] {
        match self {
            Self::Moved {
                cascade_removed, ..
            }
            | Self::Rotated {
                cascade_removed, ..
            }
            | Self::Removed {
                cascade_removed, ..
            } => cascade_removed,
            _ => &[],
        }
    }
}

/// The brickyard mutation coordinator for one scene.
pub struct SceneEngine {
    store: Arc<dyn SceneStore>,
    catalog: Arc<dyn TypeCatalog>,
    config: EngineConfig,
    feed: ChangeFeed,
}

impl std::fmt::Debug for SceneEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneEngine")
            .field("config", &self.config)
            .field("subscribers", &self.feed.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl SceneEngine {
    /// Create an engine over an injected store and catalog.
    ///
    /// # Errors
    /// `InvalidConfig` if `config` does not validate.
    pub fn new(
        store: Arc<dyn SceneStore>,
        catalog: Arc<dyn TypeCatalog>,
        config: EngineConfig,
    ) -> BrickResult<Self> {
        config.validate()?;
        let feed = ChangeFeed::new(config.event_stream_capacity);
        Ok(Self {
            store,
            catalog,
            config,
            feed,
        })
    }

    /// An engine over a fresh in-memory scene and the built-in catalog,
    /// with default configuration.
    #[must_use]
    pub fn in_memory() -> Self {
        let config = EngineConfig::default();
        let feed = ChangeFeed::new(config.event_stream_capacity);
        Self {
            store: Arc::new(InMemorySceneStore::new(config.default_scene_name.clone())),
            catalog: Arc::new(InMemoryCatalog::with_builtin_types()),
            config,
            feed,
        }
    }

    /// An engine over a fresh in-memory scene and the built-in catalog.
    ///
    /// # Errors
    /// `InvalidConfig` if `config` does not validate.
    pub fn in_memory_with_config(config: EngineConfig) -> BrickResult<Self> {
        let store = Arc::new(InMemorySceneStore::new(config.default_scene_name.clone()));
        Self::new(store, Arc::new(InMemoryCatalog::with_builtin_types()), config)
    }

    /// Execute a mutation request.
    ///
    /// # Errors
    /// - `Validation`: the request is malformed
    /// - `Placement`: the geometric checks rejected it
    /// - `Execution`: unknown brick, version conflict or storage failure
    pub fn execute(&self, request: MutationRequest) -> BrickResult<EngineResponse> {
        request.validate(self.config.max_batch_size)?;
        tracing::debug!(
            request_id = %request.request_id,
            op = request.mutation.name(),
            "executing mutation"
        );
        self.dispatch(request.mutation)
    }

    /// Validate and apply a bare mutation.
    ///
    /// # Errors
    /// See [`SceneEngine::execute`].
    pub fn apply(&self, mutation: Mutation) -> BrickResult<EngineResponse> {
        mutation.validate(self.config.max_batch_size)?;
        self.dispatch(mutation)
    }

    fn dispatch(&self, mutation: Mutation) -> BrickResult<EngineResponse> {
        match mutation {
            Mutation::Place(p) => self.execute_place(p),
            Mutation::Move(p) => self.execute_move(p.brick_id, p.position),
            Mutation::Rotate(p) => self.execute_rotate(p.brick_id, p.rotation),
            Mutation::Paint(p) => self.execute_paint(p.brick_id, p.color),
            Mutation::Remove(p) => self.execute_remove(p.brick_id),
            Mutation::Clear => self.execute_clear(),
            Mutation::Import(p) => self.execute_import(&p.scene_json),
            Mutation::PlaceBatch(p) => self
                .execute_batch(p.bricks, &CancellationToken::new(), |_| {})
                .map(EngineResponse::Batch),
            Mutation::Rename(p) => self.execute_rename(p.name),
        }
    }

    /// Place a new brick. `color` falls back to the configured default.
    ///
    /// # Errors
    /// See [`SceneEngine::execute`].
    pub fn place(
        &self,
        type_id: impl Into<String>,
        position: GridPosition,
        rotation: Rotation,
        color: Option<String>,
    ) -> BrickResult<EngineResponse> {
        self.apply(Mutation::Place(PlacePayload {
            type_id: type_id.into(),
            position,
            rotation,
            color,
        }))
    }

    /// Move a brick, keeping its rotation.
    ///
    /// # Errors
    /// See [`SceneEngine::execute`].
    pub fn move_brick(&self, id: BrickId, position: GridPosition) -> BrickResult<EngineResponse> {
        self.execute_move(id, position)
    }

    /// Rotate a brick in place.
    ///
    /// # Errors
    /// See [`SceneEngine::execute`].
    pub fn rotate(&self, id: BrickId, rotation: Rotation) -> BrickResult<EngineResponse> {
        self.execute_rotate(id, rotation)
    }

    /// Repaint a brick. No geometric checks.
    ///
    /// # Errors
    /// `InvalidColor` or `BrickNotFound`.
    pub fn paint(&self, id: BrickId, color: impl Into<String>) -> BrickResult<EngineResponse> {
        self.apply(Mutation::Paint(PaintPayload {
            brick_id: id,
            color: color.into(),
        }))
    }

    /// Remove a brick and cascade.
    ///
    /// # Errors
    /// `BrickNotFound` if the brick is not in the scene.
    pub fn remove(&self, id: BrickId) -> BrickResult<EngineResponse> {
        self.execute_remove(id)
    }

    /// Remove every brick.
    ///
    /// # Errors
    /// Storage failures only.
    pub fn clear(&self) -> BrickResult<EngineResponse> {
        self.execute_clear()
    }

    /// Replace the scene with a foreign scene document.
    ///
    /// # Errors
    /// `InvalidImportFormat` if the document shape is wrong. Individual bad
    /// bricks are dropped, not errors.
    pub fn import(&self, scene_json: impl Into<String>) -> BrickResult<EngineResponse> {
        self.apply(Mutation::Import(ImportPayload {
            scene_json: scene_json.into(),
        }))
    }

    /// Rename the scene.
    ///
    /// # Errors
    /// `MissingField` or `FieldTooLong` for a bad name.
    pub fn rename(&self, name: impl Into<String>) -> BrickResult<EngineResponse> {
        self.apply(Mutation::Rename(RenamePayload { name: name.into() }))
    }

    /// Place a batch of bricks, reporting progress after every candidate.
    ///
    /// # Errors
    /// `BatchTooLarge` or an invalid entry. Rejected candidates are recorded
    /// in the outcome instead.
    pub fn place_batch<F>(
        &self,
        bricks: Vec<PlacePayload>,
        cancel: &CancellationToken,
        observer: F,
    ) -> BrickResult<BatchOutcome>
    where
        F: FnMut(&BatchProgress),
    {
        let payload = crate::ir::BatchPayload { bricks };
        payload.validate(self.config.max_batch_size)?;
        self.execute_batch(payload.bricks, cancel, observer)
    }

    /// Check a placement against the current scene without committing.
    ///
    /// # Errors
    /// The rejection the same PLACE would get.
    pub fn preview_place(
        &self,
        type_id: impl Into<String>,
        position: GridPosition,
        rotation: Rotation,
    ) -> BrickResult<FootprintSummary> {
        let (_, view) = self.load()?;
        let candidate = Candidate::new(type_id, position, rotation);
        let validated = self.validate(&view, &candidate, None)?;
        Ok(validated.geometry.aabb.into())
    }

    /// Check a move against the current scene without committing.
    ///
    /// # Errors
    /// `BrickNotFound`, or the rejection the same MOVE would get.
    pub fn preview_move(&self, id: BrickId, position: GridPosition) -> BrickResult<FootprintSummary> {
        let (scene, view) = self.load()?;
        let brick = scene
            .get(id)
            .ok_or(ExecutionError::BrickNotFound { id })?;
        let candidate = Candidate::new(brick.type_id.clone(), position, brick.rotation);
        let validated = self.validate(&view, &candidate, Some(id))?;
        Ok(validated.geometry.aabb.into())
    }

    /// Check a rotation against the current scene without committing.
    ///
    /// # Errors
    /// `BrickNotFound`, or the rejection the same ROTATE would get.
    pub fn preview_rotate(&self, id: BrickId, rotation: Rotation) -> BrickResult<FootprintSummary> {
        let (scene, view) = self.load()?;
        let brick = scene
            .get(id)
            .ok_or(ExecutionError::BrickNotFound { id })?;
        let candidate = Candidate::new(brick.type_id.clone(), brick.position, rotation);
        let validated = self.validate(&view, &candidate, Some(id))?;
        Ok(validated.geometry.aabb.into())
    }

    /// Current scene with derived footprints.
    ///
    /// # Errors
    /// Storage or catalog failures.
    pub fn snapshot(&self) -> BrickResult<SceneSnapshot> {
        let scene = self.store.load().map_err(Self::storage_err)?;
        self.snapshot_of(scene)
    }

    /// A snapshot if the scene changed after `version`, otherwise `None`.
    ///
    /// # Errors
    /// Storage or catalog failures.
    pub fn changed_since(&self, version: u64) -> BrickResult<Option<SceneSnapshot>> {
        let scene = self.store.load().map_err(Self::storage_err)?;
        if scene.version <= version {
            return Ok(None);
        }
        self.snapshot_of(scene).map(Some)
    }

    /// Current scene version.
    ///
    /// # Errors
    /// Storage failures.
    pub fn version(&self) -> BrickResult<u64> {
        self.store.version().map_err(Self::storage_err)
    }

    /// A copy of the current scene.
    ///
    /// # Errors
    /// Storage failures.
    pub fn scene(&self) -> BrickResult<Scene> {
        self.store.load().map_err(Self::storage_err)
    }

    /// The scene as pretty JSON, `{ "name": ..., "bricks": [...] }`.
    ///
    /// The output is accepted by [`SceneEngine::import`].
    ///
    /// # Errors
    /// Storage or serialization failures.
    pub fn export_json(&self) -> BrickResult<String> {
        let scene = self.scene()?;
        serde_json::to_string_pretty(&SceneDocument::from(&scene))
            .map_err(|e| BrickError::internal(format!("scene export failed: {e}")))
    }

    /// Name, brick count, extent and color histogram.
    ///
    /// # Errors
    /// Storage or catalog failures.
    pub fn summary(&self) -> BrickResult<SceneSummary> {
        let (scene, view) = self.load()?;
        Ok(SceneSummary::compute(
            &scene,
            view.iter().map(|b| b.geometry.aabb),
        ))
    }

    /// Subscribe to committed mutations.
    #[must_use]
    pub fn subscribe(&self) -> SceneEventStream {
        self.feed.subscribe()
    }

    /// The change feed.
    #[must_use]
    pub const fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// The type catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn TypeCatalog {
        self.catalog.as_ref()
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn storage_err(err: StorageError) -> BrickError {
        match err {
            StorageError::VersionConflict { expected, actual } => {
                BrickError::Execution(ExecutionError::VersionConflict { expected, actual })
            }
            StorageError::BackendError(message) => {
                BrickError::Execution(ExecutionError::Storage { message })
            }
        }
    }

    fn load(&self) -> BrickResult<(Scene, SceneView)> {
        let scene = self.store.load().map_err(Self::storage_err)?;
        let view = SceneView::resolve(&scene.bricks, self.catalog.as_ref())?;
        Ok((scene, view))
    }

    fn snapshot_of(&self, scene: Scene) -> BrickResult<SceneSnapshot> {
        let mut bricks = Vec::with_capacity(scene.bricks.len());
        for brick in scene.bricks {
            let footprint: Option<FootprintSummary> = self
                .catalog
                .get(&brick.type_id)?
                .map(|definition| world_aabb(&definition, brick.position, brick.rotation).into());
            bricks.push(BrickView { brick, footprint });
        }
        Ok(SceneSnapshot {
            name: scene.name,
            version: scene.version,
            bricks,
        })
    }

    fn validate(
        &self,
        view: &SceneView,
        candidate: &Candidate,
        exclude: Option<BrickId>,
    ) -> BrickResult<Validated> {
        validate_candidate(
            view,
            self.catalog.as_ref(),
            candidate,
            exclude,
            self.config.building_size,
        )
    }

    fn commit(&self, expected: u64, name: String, bricks: Vec<BrickInstance>) -> BrickResult<u64> {
        self.store
            .commit(expected, name, bricks)
            .map_err(Self::storage_err)
    }

    fn publish(&self, event: SceneEvent) {
        self.feed.publish(&event);
    }

    fn place_one(
        &self,
        payload: PlacePayload,
    ) -> BrickResult<(BrickInstance, FootprintSummary, u64)> {
        let (scene, view) = self.load()?;
        let candidate = Candidate::new(payload.type_id, payload.position, payload.rotation);
        let validated = self.validate(&view, &candidate, None)?;

        let color = payload
            .color
            .unwrap_or_else(|| self.config.default_color.clone());
        let brick = BrickInstance::new(
            candidate.type_id,
            candidate.position,
            candidate.rotation,
            color,
        );

        let mut bricks = scene.bricks;
        bricks.push(brick.clone());
        let version = self.commit(scene.version, scene.name, bricks)?;

        tracing::debug!(brick = %brick.id, version, "placed {}", brick.describe());
        self.publish(SceneEvent::new(version, SceneEventKind::Placed, vec![brick.id]));

        Ok((brick, validated.geometry.aabb.into(), version))
    }

    fn execute_place(&self, payload: PlacePayload) -> BrickResult<EngineResponse> {
        let (brick, footprint, version) = self.place_one(payload)?;
        Ok(EngineResponse::Placed {
            brick,
            footprint,
            version,
        })
    }

    /// Validates `brick` at its new pose, commits it and the cascade that follows.
    fn commit_transform(
        &self,
        scene: Scene,
        mut view: SceneView,
        index: usize,
        candidate: &Candidate,
    ) -> BrickResult<(BrickInstance, FootprintSummary, Vec<BrickId>, u64)> {
        let id = scene.bricks[index].id;
        let validated = self.validate(&view, candidate, Some(id))?;

        let mut bricks = scene.bricks;
        bricks[index].position = candidate.position;
        bricks[index].rotation = candidate.rotation;
        let brick = bricks[index].clone();

        view.upsert(PlacedBrick {
            instance: brick.clone(),
            definition: validated.definition,
            geometry: validated.geometry.clone(),
        });
        let cascade_removed = cascade_unsupported(&mut view);
        if !cascade_removed.is_empty() {
            bricks.retain(|b| !cascade_removed.contains(&b.id));
            tracing::info!(
                brick = %id,
                removed = cascade_removed.len(),
                "cascade removed unsupported bricks"
            );
        }

        let version = self.commit(scene.version, scene.name, bricks)?;
        Ok((
            brick,
            validated.geometry.aabb.into(),
            cascade_removed,
            version,
        ))
    }

    fn find_index(scene: &Scene, id: BrickId) -> BrickResult<usize> {
        scene
            .bricks
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| BrickError::Execution(ExecutionError::BrickNotFound { id }))
    }

    fn execute_move(&self, id: BrickId, position: GridPosition) -> BrickResult<EngineResponse> {
        let (scene, view) = self.load()?;
        let index = Self::find_index(&scene, id)?;
        let current = &scene.bricks[index];
        let candidate = Candidate::new(current.type_id.clone(), position, current.rotation);

        let (brick, footprint, cascade_removed, version) =
            self.commit_transform(scene, view, index, &candidate)?;

        tracing::debug!(brick = %id, version, "moved to {position}");
        self.publish(
            SceneEvent::new(version, SceneEventKind::Moved, vec![id])
                .with_cascade(cascade_removed.clone()),
        );

        Ok(EngineResponse::Moved {
            brick,
            footprint,
            cascade_removed,
            version,
        })
    }

    fn execute_rotate(&self, id: BrickId, rotation: Rotation) -> BrickResult<EngineResponse> {
        let (scene, view) = self.load()?;
        let index = Self::find_index(&scene, id)?;
        let current = &scene.bricks[index];
        let candidate = Candidate::new(current.type_id.clone(), current.position, rotation);

        let (brick, footprint, cascade_removed, version) =
            self.commit_transform(scene, view, index, &candidate)?;

        tracing::debug!(brick = %id, version, "rotated to {rotation}");
        self.publish(
            SceneEvent::new(version, SceneEventKind::Rotated, vec![id])
                .with_cascade(cascade_removed.clone()),
        );

        Ok(EngineResponse::Rotated {
            brick,
            footprint,
            cascade_removed,
            version,
        })
    }

    fn execute_paint(&self, id: BrickId, color: String) -> BrickResult<EngineResponse> {
        let scene = self.scene()?;
        let index = Self::find_index(&scene, id)?;

        let mut bricks = scene.bricks;
        bricks[index].color = color;
        let brick = bricks[index].clone();
        let version = self.commit(scene.version, scene.name, bricks)?;

        tracing::debug!(brick = %id, version, color = %brick.color, "painted");
        self.publish(SceneEvent::new(version, SceneEventKind::Painted, vec![id]));

        Ok(EngineResponse::Painted { brick, version })
    }

    fn execute_remove(&self, id: BrickId) -> BrickResult<EngineResponse> {
        let (scene, mut view) = self.load()?;
        let index = Self::find_index(&scene, id)?;

        let mut bricks = scene.bricks;
        let removed = bricks.remove(index);
        view.remove_all(&[id]);
        let cascade_removed = cascade_unsupported(&mut view);
        if !cascade_removed.is_empty() {
            bricks.retain(|b| !cascade_removed.contains(&b.id));
            tracing::info!(
                brick = %id,
                removed = cascade_removed.len(),
                "cascade removed unsupported bricks"
            );
        }

        let version = self.commit(scene.version, scene.name, bricks)?;

        tracing::debug!(brick = %id, version, "removed");
        self.publish(
            SceneEvent::new(version, SceneEventKind::Removed, vec![id])
                .with_cascade(cascade_removed.clone()),
        );

        Ok(EngineResponse::Removed {
            removed,
            cascade_removed,
            version,
        })
    }

    fn execute_clear(&self) -> BrickResult<EngineResponse> {
        let scene = self.scene()?;
        let ids: Vec<BrickId> = scene.bricks.iter().map(|b| b.id).collect();
        let removed_count = ids.len();
        let version = self.commit(scene.version, scene.name, Vec::new())?;

        tracing::debug!(version, removed_count, "scene cleared");
        self.publish(SceneEvent::new(version, SceneEventKind::Cleared, ids));

        Ok(EngineResponse::Cleared {
            removed_count,
            version,
        })
    }

    fn execute_import(&self, scene_json: &str) -> BrickResult<EngineResponse> {
        let raw = parse_scene(scene_json)?;
        let expected = self.version()?;

        let mut entries = raw.bricks;
        // Stable: equal heights keep document order.
        entries.sort_by_key(|b| b.position.y);

        let mut view = SceneView::new();
        let mut bricks = Vec::with_capacity(entries.len());
        let mut used: HashSet<BrickId> = HashSet::new();
        let mut dropped = raw.undecodable;

        for entry in entries {
            let color = match entry.color.as_deref() {
                None => self.config.default_color.clone(),
                Some(c) if is_hex_color(c) => c.to_string(),
                Some(c) => {
                    tracing::debug!(type_id = %entry.type_id, color = c, "import entry has invalid color");
                    dropped += 1;
                    continue;
                }
            };

            let candidate = Candidate::new(entry.type_id.clone(), entry.position, entry.rotation);
            let validated = match self.validate(&view, &candidate, None) {
                Ok(validated) => validated,
                Err(BrickError::Placement(reason)) => {
                    tracing::debug!(%reason, "import entry dropped");
                    dropped += 1;
                    continue;
                }
                Err(other) => return Err(other),
            };

            let id = entry
                .parsed_id()
                .filter(|id| !id.is_nil() && !used.contains(id))
                .unwrap_or_default();
            used.insert(id);

            let brick = BrickInstance {
                id,
                type_id: candidate.type_id,
                position: candidate.position,
                rotation: candidate.rotation,
                color,
            };
            view.push(PlacedBrick {
                instance: brick.clone(),
                definition: validated.definition,
                geometry: validated.geometry,
            });
            bricks.push(brick);
        }

        let committed = bricks.len();
        let ids: Vec<BrickId> = bricks.iter().map(|b| b.id).collect();
        let name = raw.name;
        let version = self.commit(expected, name.clone(), bricks)?;

        if dropped > 0 {
            tracing::warn!(name = %name, dropped, "import dropped invalid bricks");
        }
        tracing::info!(name = %name, committed, dropped, version, "scene imported");
        self.publish(SceneEvent::new(version, SceneEventKind::Imported, ids));

        Ok(EngineResponse::Imported {
            name,
            committed,
            dropped,
            version,
        })
    }

    fn execute_rename(&self, name: String) -> BrickResult<EngineResponse> {
        let scene = self.scene()?;
        let name = name.trim().to_string();
        let version = self.commit(scene.version, name.clone(), scene.bricks)?;

        tracing::debug!(version, name = %name, "scene renamed");
        self.publish(SceneEvent::new(version, SceneEventKind::Renamed, Vec::new()));

        Ok(EngineResponse::Renamed { name, version })
    }

    fn execute_batch<F>(
        &self,
        bricks: Vec<PlacePayload>,
        cancel: &CancellationToken,
        mut observer: F,
    ) -> BrickResult<BatchOutcome>
    where
        F: FnMut(&BatchProgress),
    {
        let total = bricks.len();
        let mut order: Vec<(usize, PlacePayload)> = bricks.into_iter().enumerate().collect();
        // Stable: supports go first, equal heights keep submission order.
        order.sort_by_key(|(_, p)| p.position.y);

        let mut outcome = BatchOutcome {
            version: self.version()?,
            ..BatchOutcome::default()
        };

        for (processed, (index, payload)) in order.into_iter().enumerate() {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                tracing::info!(processed, total, "batch cancelled");
                break;
            }

            match self.place_one(payload.clone()) {
                Ok((brick, _, version)) => {
                    outcome.version = version;
                    outcome.committed.push(brick);
                }
                Err(error) => {
                    tracing::debug!(index, %error, "batch candidate rejected");
                    outcome.failures.push(BatchFailure {
                        index,
                        payload,
                        error,
                    });
                }
            }

            observer(&BatchProgress {
                processed: processed + 1,
                total,
                committed: outcome.committed.len(),
                failed: outcome.failures.len(),
            });
        }

        tracing::info!(
            total,
            committed = outcome.committed.len(),
            failed = outcome.failures.len(),
            cancelled = outcome.cancelled,
            "batch finished"
        );
        Ok(outcome)
    }
}
