//! Scene storage.
//!
//! The trait defines the contract; `memory` provides the in-process backend.

mod memory;
mod traits;

pub use memory::InMemorySceneStore;
pub use traits::{SceneStore, StorageError};
