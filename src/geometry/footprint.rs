//! Footprint calculator.
//!
//! Turns a brick type plus a position and rotation into world-space boxes:
//! - the bounding box,
//! - the physical contact shape (one box, or two arms for corner types),
//! - the blockout volumes above the top surface that carry no studs.

use crate::catalog::{BrickTypeDefinition, FootprintShape};

use super::{Aabb, GridPosition, Rotation};

/// World bounding box: plan dimensions swapped at 90°/270°, vertical extent
/// `[y, y + height_units]`.
///
/// Extents saturate at `i32::MAX`, which always lands outside the building
/// area.
#[must_use]
pub fn world_aabb(
    definition: &BrickTypeDefinition,
    position: GridPosition,
    rotation: Rotation,
) -> Aabb {
    let (sx, sz) = definition.plan_size(rotation);
    Aabb {
        min_x: position.x,
        max_x: position.x.saturating_add(sx),
        min_y: position.y,
        max_y: position.y.saturating_add(definition.height_units),
        min_z: position.z,
        max_z: position.z.saturating_add(sz),
    }
}

/// Physical contact shape.
///
/// Corner types decompose into a row arm (full width, depth 1) and a column
/// arm (width 1, remaining depth). The empty notch sits at +X+Z for 0°, +X−Z
/// for 90°, −X−Z for 180° and −X+Z for 270°.
#[must_use]
pub fn physical_footprint(
    definition: &BrickTypeDefinition,
    position: GridPosition,
    rotation: Rotation,
) -> Vec<Aabb> {
    let aabb = world_aabb(definition, position, rotation);
    match definition.shape() {
        FootprintShape::Rectangle => vec![aabb],
        FootprintShape::Corner => {
            let row_at_z_max = matches!(rotation, Rotation::Deg90 | Rotation::Deg180);
            let col_at_x_max = matches!(rotation, Rotation::Deg180 | Rotation::Deg270);

            let row_arm = Aabb {
                min_z: if row_at_z_max { aabb.max_z - 1 } else { aabb.min_z },
                max_z: if row_at_z_max { aabb.max_z } else { aabb.min_z.saturating_add(1) },
                ..aabb
            };
            let col_arm = Aabb {
                min_x: if col_at_x_max { aabb.max_x - 1 } else { aabb.min_x },
                max_x: if col_at_x_max { aabb.max_x } else { aabb.min_x.saturating_add(1) },
                min_z: if row_at_z_max { aabb.min_z } else { aabb.min_z.saturating_add(1) },
                max_z: if row_at_z_max { aabb.max_z - 1 } else { aabb.max_z },
                ..aabb
            };
            vec![row_arm, col_arm]
        }
    }
}

/// World blockout volumes, extruded upward from the top surface.
///
/// Each zone is rotated about the type's plan center. The arithmetic runs
/// in doubled coordinates so quarter turns stay exact, and the result is
/// re-anchored on the rotated footprint.
#[must_use]
pub fn blockout_volumes(
    definition: &BrickTypeDefinition,
    position: GridPosition,
    rotation: Rotation,
) -> Vec<Aabb> {
    if definition.blockout.is_empty() {
        return Vec::new();
    }

    let (sx, sz) = (definition.studs_x, definition.studs_z);
    let (rsx, rsz) = definition.plan_size(rotation);
    let top_y = position.y.saturating_add(definition.height_units);

    definition
        .blockout
        .iter()
        .map(|zone| {
            let (ax, az) = rotation.rotate_offset(2 * zone.min_x - sx, 2 * zone.min_z - sz);
            let (bx, bz) = rotation.rotate_offset(2 * zone.max_x - sx, 2 * zone.max_z - sz);
            Aabb {
                min_x: position.x.saturating_add((ax.min(bx) + rsx) / 2),
                max_x: position.x.saturating_add((ax.max(bx) + rsx) / 2),
                min_y: top_y,
                max_y: top_y.saturating_add(zone.height),
                min_z: position.z.saturating_add((az.min(bz) + rsz) / 2),
                max_z: position.z.saturating_add((az.max(bz) + rsz) / 2),
            }
        })
        .collect()
}

/// All derived geometry of one placed brick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrickGeometry {
    /// World bounding box.
    pub aabb: Aabb,
    /// Physical contact boxes.
    pub footprint: Vec<Aabb>,
    /// Blockout volumes above the top surface.
    pub blockouts: Vec<Aabb>,
}

impl BrickGeometry {
    /// Computes every derived box for a type at a position and rotation.
    #[must_use]
    pub fn compute(
        definition: &BrickTypeDefinition,
        position: GridPosition,
        rotation: Rotation,
    ) -> Self {
        Self {
            aabb: world_aabb(definition, position, rotation),
            footprint: physical_footprint(definition, position, rotation),
            blockouts: blockout_volumes(definition, position, rotation),
        }
    }

    /// True if any physical box of `self` overlaps any of `other` in 3D.
    #[must_use]
    pub fn footprint_overlaps(&self, other: &Self) -> bool {
        self.footprint
            .iter()
            .any(|a| other.footprint.iter().any(|b| a.overlaps(b)))
    }

    /// True if the physical shapes overlap in plan, ignoring height.
    #[must_use]
    pub fn footprint_overlaps_plan(&self, other: &Self) -> bool {
        self.footprint
            .iter()
            .any(|a| other.footprint.iter().any(|b| a.overlaps_plan(b)))
    }
}
