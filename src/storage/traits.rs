//! Abstract scene storage.
//!
//! The engine receives a [`SceneStore`] handle at construction, so whether a
//! scene is per-client or shared, and where it lives, is decided by the
//! embedding layer.

use thiserror::Error;

use crate::scene::{BrickInstance, Scene};

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Another writer committed since the caller loaded the scene.
    #[error("Version conflict: expected {expected}, found {actual}")]
    VersionConflict {
        /// Version the caller validated against.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Storage contract for a single scene.
///
/// # Consistency
/// `commit` is a compare-and-swap on the version: it only succeeds if the
/// stored version still equals `expected_version`, and then stores
/// `expected_version + 1`. Validation against a loaded scene followed by a
/// successful commit is therefore atomic.
pub trait SceneStore: Send + Sync {
    /// Returns a copy of the current scene.
    fn load(&self) -> Result<Scene, StorageError>;

    /// Returns the current version without copying bricks.
    fn version(&self) -> Result<u64, StorageError>;

    /// Replaces name and bricks, returning the new version.
    ///
    /// # Errors
    /// - `VersionConflict`: the stored version is not `expected_version`
    fn commit(
        &self,
        expected_version: u64,
        name: String,
        bricks: Vec<BrickInstance>,
    ) -> Result<u64, StorageError>;
}
