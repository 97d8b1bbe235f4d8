//! In-memory storage backend.
//!
//! Thread-safe, intended for embedded usage and tests.

use std::sync::RwLock;

use crate::scene::{BrickInstance, Scene};
use crate::storage::traits::{SceneStore, StorageError};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

/// Thread-safe in-memory scene store.
#[derive(Debug)]
pub struct InMemorySceneStore {
    state: RwLock<Scene>,
}

impl InMemorySceneStore {
    /// Creates a store holding an empty scene.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_scene(Scene::new(name))
    }

    /// Creates a store holding an existing scene, keeping its version.
    #[must_use]
    pub fn from_scene(scene: Scene) -> Self {
        Self {
            state: RwLock::new(scene),
        }
    }
}

impl SceneStore for InMemorySceneStore {
    fn load(&self) -> Result<Scene, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("scene.load"))?;
        Ok(state.clone())
    }

    fn version(&self) -> Result<u64, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("scene.version"))?;
        Ok(state.version)
    }

    fn commit(
        &self,
        expected_version: u64,
        name: String,
        bricks: Vec<BrickInstance>,
    ) -> Result<u64, StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("scene.commit"))?;
        if state.version != expected_version {
            return Err(StorageError::VersionConflict {
                expected: expected_version,
                actual: state.version,
            });
        }
        state.name = name;
        state.bricks = bricks;
        state.version += 1;
        Ok(state.version)
    }
}
