//! Bounds checker.

use crate::geometry::{Aabb, Axis};

/// Highest grid unit a brick's top surface may reach.
pub const MAX_ELEVATION: i32 = 1 << 24;

/// Returns the first axis on which `aabb` leaves the building area.
///
/// The area is `[0, building_size)` on X and Z, and `[0, MAX_ELEVATION]`
/// vertically. Axes are checked in the order X, Z, Y.
#[must_use]
pub const fn check_bounds(aabb: &Aabb, building_size: i32) -> Option<Axis> {
    if aabb.min_x < 0 || aabb.max_x > building_size {
        return Some(Axis::X);
    }
    if aabb.min_z < 0 || aabb.max_z > building_size {
        return Some(Axis::Z);
    }
    if aabb.min_y < 0 || aabb.max_y > MAX_ELEVATION {
        return Some(Axis::Y);
    }
    None
}
