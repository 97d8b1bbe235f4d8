//! Axis-aligned boxes in world grid space.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box with half-open extents on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aabb {
    #[allow(missing_docs)]
    pub min_x: i32,
    #[allow(missing_docs)]
    pub max_x: i32,
    #[allow(missing_docs)]
    pub min_y: i32,
    #[allow(missing_docs)]
    pub max_y: i32,
    #[allow(missing_docs)]
    pub min_z: i32,
    #[allow(missing_docs)]
    pub max_z: i32,
}

impl Aabb {
    /// Strict 3D interval overlap. Boxes that only touch do not overlap.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.min_y < other.max_y && self.max_y > other.min_y && self.overlaps_plan(other)
    }

    /// Strict overlap of the horizontal (X/Z) projections.
    #[must_use]
    pub const fn overlaps_plan(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_z < other.max_z
            && self.max_z > other.min_z
    }

    /// Horizontal projection of this box.
    #[must_use]
    pub const fn plan(&self) -> PlanRect {
        PlanRect {
            min_x: self.min_x,
            max_x: self.max_x,
            min_z: self.min_z,
            max_z: self.max_z,
        }
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
            min_z: self.min_z.min(other.min_z),
            max_z: self.max_z.max(other.max_z),
        }
    }
}

/// Horizontal rectangle (X/Z), half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanRect {
    #[allow(missing_docs)]
    pub min_x: i32,
    #[allow(missing_docs)]
    pub max_x: i32,
    #[allow(missing_docs)]
    pub min_z: i32,
    #[allow(missing_docs)]
    pub max_z: i32,
}

impl PlanRect {
    /// Intersection of two rectangles, or `None` when it has no area.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let rect = Self {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_z: self.min_z.max(other.min_z),
            max_z: self.max_z.min(other.max_z),
        };
        if rect.min_x >= rect.max_x || rect.min_z >= rect.max_z {
            return None;
        }
        Some(rect)
    }

    /// True if `self` lies entirely inside `outer` (edges may coincide).
    #[must_use]
    pub const fn is_within(&self, outer: &Self) -> bool {
        self.min_x >= outer.min_x
            && self.max_x <= outer.max_x
            && self.min_z >= outer.min_z
            && self.max_z <= outer.max_z
    }
}

/// Derived world footprint reported to collaborators after a mutation.
///
/// `top_y` is the Y at which a brick stacked on top must be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintSummary {
    #[allow(missing_docs)]
    pub min_x: i32,
    #[allow(missing_docs)]
    pub max_x: i32,
    #[allow(missing_docs)]
    pub min_z: i32,
    #[allow(missing_docs)]
    pub max_z: i32,
    #[allow(missing_docs)]
    pub top_y: i32,
}

impl From<Aabb> for FootprintSummary {
    fn from(aabb: Aabb) -> Self {
        Self {
            min_x: aabb.min_x,
            max_x: aabb.max_x,
            min_z: aabb.min_z,
            max_z: aabb.max_z,
            top_y: aabb.max_y,
        }
    }
}
