//! Collision engine.

use crate::geometry::{Aabb, BrickGeometry};
use crate::placement::SceneView;
use crate::scene::BrickId;

/// True if `top` sits on real stud-bearing area of `bottom`.
///
/// Requires flush vertical contact and a non-empty plan intersection that
/// is not wholly inside a single blockout of `bottom`.
#[must_use]
pub fn has_stud_support(top: &Aabb, bottom: &Aabb, bottom_blockouts: &[Aabb]) -> bool {
    if top.min_y != bottom.max_y {
        return false;
    }
    let Some(contact) = top.plan().intersection(&bottom.plan()) else {
        return false;
    };
    !bottom_blockouts
        .iter()
        .any(|zone| contact.is_within(&zone.plan()))
}

fn blocks(candidate: &BrickGeometry, other: &BrickGeometry) -> bool {
    if candidate.footprint_overlaps(other) {
        return true;
    }

    // Candidate inside the other's blockout, unless it also rests on that brick's studs.
    if other.blockouts.iter().any(|zone| candidate.aabb.overlaps(zone))
        && !has_stud_support(&candidate.aabb, &other.aabb, &other.blockouts)
    {
        return true;
    }

    candidate.blockouts.iter().any(|zone| other.aabb.overlaps(zone))
        && !has_stud_support(&other.aabb, &candidate.aabb, &candidate.blockouts)
}

/// Returns the first brick that blocks the candidate, if any.
///
/// A brick blocks when physical footprints overlap in 3D, or when either
/// brick's AABB enters the other's blockout volume without resting on its
/// studs. The brick with id `exclude` is ignored.
#[must_use]
pub fn check_collision(
    view: &SceneView,
    candidate: &BrickGeometry,
    exclude: Option<BrickId>,
) -> Option<BrickId> {
    view.others(exclude)
        .find(|other| blocks(candidate, &other.geometry))
        .map(|other| other.instance.id)
}

/// Returns the first brick whose physical footprint interpenetrates the candidate.
#[must_use]
pub fn find_interpenetration(
    view: &SceneView,
    candidate: &BrickGeometry,
    exclude: Option<BrickId>,
) -> Option<BrickId> {
    view.others(exclude)
        .find(|other| candidate.footprint_overlaps(&other.geometry))
        .map(|other| other.instance.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::geometry::{GridPosition, Rotation};
    use crate::placement::test_support::{geometry_of, view_of};

    fn boxed(x: (i32, i32), y: (i32, i32), z: (i32, i32)) -> Aabb {
        Aabb {
            min_x: x.0,
            max_x: x.1,
            min_y: y.0,
            max_y: y.1,
            min_z: z.0,
            max_z: z.1,
        }
    }

    #[test]
    fn test_stud_support_needs_flush_contact() {
        let bottom = boxed((0, 2), (0, 3), (0, 2));
        assert!(has_stud_support(&boxed((0, 1), (3, 6), (0, 1)), &bottom, &[]));
        assert!(!has_stud_support(&boxed((0, 1), (4, 7), (0, 1)), &bottom, &[]));
        assert!(!has_stud_support(&boxed((2, 3), (3, 6), (0, 1)), &bottom, &[]));
    }

    #[test]
    fn test_stud_support_inside_blockout() {
        let bottom = boxed((0, 2), (0, 3), (0, 2));
        let zone = boxed((0, 2), (3, 6), (1, 2));
        assert!(!has_stud_support(&boxed((0, 1), (3, 6), (1, 2)), &bottom, &[zone]));
        assert!(has_stud_support(&boxed((0, 2), (3, 6), (0, 2)), &bottom, &[zone]));
    }

    #[test]
    fn test_identical_bricks_collide() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(&catalog, &[("brick_1x1", (4, 0, 4), Rotation::Deg0)]);
        let first = view.iter().next().unwrap().instance.id;
        let g = geometry_of(&catalog, "brick_1x1", GridPosition::new(4, 0, 4), Rotation::Deg0);
        assert_eq!(check_collision(&view, &g, None), Some(first));
        assert_eq!(check_collision(&view, &g, Some(first)), None);
    }

    #[test]
    fn test_adjacent_bricks_do_not_collide() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(&catalog, &[("brick_2x4", (0, 0, 0), Rotation::Deg0)]);
        let beside = geometry_of(&catalog, "brick_2x4", GridPosition::new(2, 0, 0), Rotation::Deg0);
        let above = geometry_of(&catalog, "brick_2x4", GridPosition::new(0, 3, 0), Rotation::Deg0);
        assert_eq!(check_collision(&view, &beside, None), None);
        assert_eq!(check_collision(&view, &above, None), None);
    }

    #[test]
    fn test_corner_notch_is_free() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(&catalog, &[("corner_2x2", (0, 0, 0), Rotation::Deg0)]);
        let in_notch = geometry_of(&catalog, "brick_1x1", GridPosition::new(1, 0, 1), Rotation::Deg0);
        let on_arm = geometry_of(&catalog, "brick_1x1", GridPosition::new(0, 0, 0), Rotation::Deg0);
        assert_eq!(check_collision(&view, &in_notch, None), None);
        assert!(check_collision(&view, &on_arm, None).is_some());
    }

    #[test]
    fn test_slope_face_blocks_but_flat_top_allows() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(&catalog, &[("slope_2x2", (0, 0, 0), Rotation::Deg0)]);

        let on_face = geometry_of(&catalog, "brick_1x1", GridPosition::new(0, 3, 1), Rotation::Deg0);
        assert!(check_collision(&view, &on_face, None).is_some());

        let on_flat = geometry_of(&catalog, "brick_1x1", GridPosition::new(0, 3, 0), Rotation::Deg0);
        assert_eq!(check_collision(&view, &on_flat, None), None);

        let spanning = geometry_of(&catalog, "brick_2x2", GridPosition::new(0, 3, 0), Rotation::Deg0);
        assert_eq!(check_collision(&view, &spanning, None), None);
    }

    #[test]
    fn test_new_slope_cannot_cover_existing_brick() {
        let catalog = InMemoryCatalog::with_builtin_types();
        // A brick floating over where the slope face would be; placing the
        // slope underneath must respect the symmetric blockout check.
        let view = view_of(&catalog, &[("brick_1x1", (0, 3, 1), Rotation::Deg0)]);
        let slope = geometry_of(&catalog, "slope_2x2", GridPosition::new(0, 0, 0), Rotation::Deg0);
        assert!(check_collision(&view, &slope, None).is_some());

        let turned = geometry_of(&catalog, "slope_2x2", GridPosition::new(0, 0, 0), Rotation::Deg180);
        assert_eq!(check_collision(&view, &turned, None), None);
    }

    #[test]
    fn test_interpenetration_ignores_blockouts() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(&catalog, &[("slope_2x2", (0, 0, 0), Rotation::Deg0)]);
        let on_face = geometry_of(&catalog, "brick_1x1", GridPosition::new(0, 3, 1), Rotation::Deg0);
        assert_eq!(find_interpenetration(&view, &on_face, None), None);

        let sunk = geometry_of(&catalog, "brick_1x1", GridPosition::new(0, 1, 0), Rotation::Deg0);
        assert!(find_interpenetration(&view, &sunk, None).is_some());
    }
}
