//! Grid geometry: positions, rotations, boxes and the footprint calculator.
//!
//! All coordinates are integer grid units. The horizontal plane is X/Z
//! (one unit = one stud) and Y is vertical (one unit = one plate height).

mod aabb;
mod footprint;
mod rotation;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use aabb::{Aabb, FootprintSummary, PlanRect};
pub use footprint::{blockout_volumes, physical_footprint, world_aabb, BrickGeometry};
pub use rotation::Rotation;

/// Integer grid position of a brick's minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPosition {
    /// Horizontal X (studs).
    pub x: i32,
    /// Vertical Y (plate heights, 0 = building surface).
    pub y: i32,
    /// Horizontal Z (studs).
    pub z: i32,
}

impl GridPosition {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for GridPosition {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

/// A world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal X.
    X,
    /// Vertical Y.
    Y,
    /// Horizontal Z.
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        };
        f.write_str(s)
    }
}
