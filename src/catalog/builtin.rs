//! The standard brick set.

use crate::catalog::types::{BlockoutZone, BrickCategory, BrickTypeDefinition};

/// Height of a brick in plate units.
pub const BRICK_HEIGHT: i32 = 3;

/// Height of a plate in plate units.
pub const PLATE_HEIGHT: i32 = 1;

/// `(studs_x, studs_z)` of each rectangular family, in listing order.
const BRICKS: &[(i32, i32)] = &[
    (1, 1),
    (1, 2),
    (1, 3),
    (1, 4),
    (1, 6),
    (1, 8),
    (2, 2),
    (2, 3),
    (2, 4),
    (2, 6),
    (2, 8),
];

const PLATES: &[(i32, i32)] = &[
    (1, 1),
    (1, 2),
    (1, 4),
    (2, 2),
    (2, 4),
    (2, 6),
    (4, 4),
    (6, 6),
    (8, 8),
    (12, 4),
    (12, 6),
    (12, 8),
    (16, 1),
    (16, 2),
    (16, 4),
    (16, 6),
    (16, 8),
];

const TECHNIC: &[(i32, i32)] = &[(1, 2), (1, 4), (1, 6), (1, 8), (2, 4)];

const CORNERS: &[i32] = &[2, 3];

fn sized(
    category: BrickCategory,
    label: &str,
    studs_x: i32,
    studs_z: i32,
    height_units: i32,
) -> BrickTypeDefinition {
    BrickTypeDefinition::new(
        format!("{category}_{studs_x}x{studs_z}"),
        format!("{studs_x}\u{d7}{studs_z} {label}"),
        category,
        studs_x,
        studs_z,
        height_units,
    )
}

/// The 36 built-in types, in listing order.
///
/// The slope's angled face covers the high-Z half of its plan; the flat
/// stud-bearing half is at low Z.
#[must_use]
pub fn builtin_types() -> Vec<BrickTypeDefinition> {
    let mut types = Vec::with_capacity(36);

    types.extend(
        BRICKS
            .iter()
            .map(|&(x, z)| sized(BrickCategory::Brick, "Brick", x, z, BRICK_HEIGHT)),
    );
    types.extend(
        PLATES
            .iter()
            .map(|&(x, z)| sized(BrickCategory::Plate, "Plate", x, z, PLATE_HEIGHT)),
    );
    types.extend(
        TECHNIC
            .iter()
            .map(|&(x, z)| sized(BrickCategory::Technic, "Technic", x, z, BRICK_HEIGHT)),
    );

    let mut slope = sized(BrickCategory::Slope, "Slope 45\u{b0}", 2, 2, BRICK_HEIGHT);
    slope.blockout.push(BlockoutZone {
        min_x: 0,
        max_x: 2,
        min_z: 1,
        max_z: 2,
        height: BRICK_HEIGHT,
    });
    types.push(slope);

    types.extend(
        CORNERS
            .iter()
            .map(|&n| sized(BrickCategory::Corner, "Corner", n, n, BRICK_HEIGHT)),
    );

    types
}
