//! Scene state: the versioned, ordered collection of placed bricks.

mod brick;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Aabb, FootprintSummary};

pub use brick::{BrickId, BrickInstance};
pub use crate::geometry::GridPosition;

/// Identifier of a scene inside a runtime or store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    /// Creates a scene id from a caller-chosen key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a random scene id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SceneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A named, versioned scene.
///
/// Brick order is insertion order and has no physical meaning. `version`
/// increases by exactly one per committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Display name.
    pub name: String,
    /// Placed bricks in insertion order.
    pub bricks: Vec<BrickInstance>,
    /// Monotonic version counter.
    #[serde(default)]
    pub version: u64,
}

impl Scene {
    /// Creates an empty scene at version 0.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bricks: Vec::new(),
            version: 0,
        }
    }

    /// Finds a brick by id.
    #[must_use]
    pub fn get(&self, id: BrickId) -> Option<&BrickInstance> {
        self.bricks.iter().find(|b| b.id == id)
    }

    /// Returns true if the scene contains a brick with this id.
    #[must_use]
    pub fn contains(&self, id: BrickId) -> bool {
        self.get(id).is_some()
    }

    /// Number of bricks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    /// Returns true if the scene has no bricks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }
}

/// Exported scene document, `{ name, bricks }`, re-importable as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub bricks: Vec<BrickInstance>,
}

impl From<&Scene> for SceneDocument {
    fn from(scene: &Scene) -> Self {
        Self {
            name: scene.name.clone(),
            bricks: scene.bricks.clone(),
        }
    }
}

/// A brick together with its derived world footprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrickView {
    /// The placed brick.
    #[serde(flatten)]
    pub brick: BrickInstance,
    /// Derived footprint, absent when the brick's type is not in the catalog.
    pub footprint: Option<FootprintSummary>,
}

/// Full-scene read for renderers and pollers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Scene name.
    pub name: String,
    /// Version the snapshot was taken at.
    pub version: u64,
    /// Bricks in insertion order.
    pub bricks: Vec<BrickView>,
}

/// Overall extent of the scene in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    #[allow(missing_docs)]
    pub z: i32,
}

/// Compact scene description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSummary {
    /// Scene name.
    pub name: String,
    /// Number of bricks.
    pub brick_count: usize,
    /// Extent of all bricks with known types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Brick count per color.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: BTreeMap<String, usize>,
}

impl SceneSummary {
    /// Builds a summary from a scene and the bounding boxes of its resolvable bricks.
    #[must_use]
    pub fn compute(scene: &Scene, bounds: impl IntoIterator<Item = Aabb>) -> Self {
        let mut colors: BTreeMap<String, usize> = BTreeMap::new();
        for brick in &scene.bricks {
            *colors.entry(brick.color.clone()).or_default() += 1;
        }

        let dimensions = bounds
            .into_iter()
            .reduce(|acc, b| acc.union(&b))
            .map(|total| Dimensions {
                x: total.max_x - total.min_x,
                y: total.max_y - total.min_y,
                z: total.max_z - total.min_z,
            });

        Self {
            name: scene.name.clone(),
            brick_count: scene.bricks.len(),
            dimensions,
            colors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rotation;

    fn brick(color: &str) -> BrickInstance {
        BrickInstance::new("brick_1x1", GridPosition::default(), Rotation::Deg0, color)
    }

    #[test]
    fn test_scene_lookup() {
        let mut scene = Scene::new("Untitled");
        assert!(scene.is_empty());
        let b = brick("#cc0000");
        let id = b.id;
        scene.bricks.push(b);
        assert!(scene.contains(id));
        assert_eq!(scene.get(id).unwrap().type_id, "brick_1x1");
        assert!(!scene.contains(BrickId::nil()));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_summary_counts_colors_and_extent() {
        let mut scene = Scene::new("Tower");
        scene.bricks.push(brick("#cc0000"));
        scene.bricks.push(brick("#cc0000"));
        scene.bricks.push(brick("#ffffff"));

        let boxes = [
            Aabb { min_x: 0, max_x: 2, min_y: 0, max_y: 3, min_z: 0, max_z: 4 },
            Aabb { min_x: 1, max_x: 5, min_y: 3, max_y: 6, min_z: 0, max_z: 2 },
        ];
        let summary = SceneSummary::compute(&scene, boxes);
        assert_eq!(summary.brick_count, 3);
        assert_eq!(summary.colors["#cc0000"], 2);
        assert_eq!(summary.dimensions, Some(Dimensions { x: 5, y: 6, z: 4 }));
    }

    #[test]
    fn test_empty_summary_has_no_dimensions() {
        let summary = SceneSummary::compute(&Scene::new("Empty"), std::iter::empty());
        assert_eq!(summary.brick_count, 0);
        assert!(summary.dimensions.is_none());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["brickCount"], 0);
        assert!(json.get("dimensions").is_none());
    }

    #[test]
    fn test_brick_view_flattens_instance() {
        let view = BrickView {
            brick: brick("#cc0000"),
            footprint: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["typeId"], "brick_1x1");
        assert!(json["footprint"].is_null());
    }
}
