//! Support engine.
//!
//! Support is a single direct-contact test against the scene as it stands:
//! no transitive reasoning, no physics.

use crate::geometry::BrickGeometry;
use crate::placement::SceneView;
use crate::scene::BrickId;

/// True if the candidate rests on the building surface or on another brick.
///
/// Resting on another brick means that brick's top is exactly at the
/// candidate's bottom and their physical footprints overlap in plan. The
/// brick with id `exclude` is ignored.
#[must_use]
pub fn check_support(view: &SceneView, candidate: &BrickGeometry, exclude: Option<BrickId>) -> bool {
    if candidate.aabb.min_y == 0 {
        return true;
    }

    view.others(exclude).any(|other| {
        other.geometry.aabb.max_y == candidate.aabb.min_y
            && candidate.footprint_overlaps_plan(&other.geometry)
    })
}

/// Ids of every brick that is unsupported by the rest of the view.
///
/// Each brick is tested against the view minus itself.
#[must_use]
pub fn find_unsupported(view: &SceneView) -> Vec<BrickId> {
    view.iter()
        .filter(|placed| !check_support(view, &placed.geometry, Some(placed.instance.id)))
        .map(|placed| placed.instance.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::geometry::{GridPosition, Rotation};
    use crate::placement::test_support::{geometry_of, view_of};

    #[test]
    fn test_ground_is_support() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(&catalog, &[]);
        let g = geometry_of(&catalog, "brick_1x1", GridPosition::new(5, 0, 5), Rotation::Deg0);
        assert!(check_support(&view, &g, None));
    }

    #[test]
    fn test_floating_is_unsupported() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(&catalog, &[]);
        let g = geometry_of(&catalog, "brick_2x4", GridPosition::new(0, 3, 0), Rotation::Deg0);
        assert!(!check_support(&view, &g, None));
    }

    #[test]
    fn test_flush_contact_supports() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(&catalog, &[("brick_2x4", (0, 0, 0), Rotation::Deg0)]);

        let on_top = geometry_of(&catalog, "brick_1x1", GridPosition::new(1, 3, 3), Rotation::Deg0);
        assert!(check_support(&view, &on_top, None));

        let gap = geometry_of(&catalog, "brick_1x1", GridPosition::new(1, 4, 3), Rotation::Deg0);
        assert!(!check_support(&view, &gap, None));

        let beside = geometry_of(&catalog, "brick_1x1", GridPosition::new(2, 3, 0), Rotation::Deg0);
        assert!(!check_support(&view, &beside, None));
    }

    #[test]
    fn test_corner_notch_gives_no_support() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(&catalog, &[("corner_2x2", (0, 0, 0), Rotation::Deg0)]);

        let over_notch = geometry_of(&catalog, "brick_1x1", GridPosition::new(1, 3, 1), Rotation::Deg0);
        assert!(!check_support(&view, &over_notch, None));

        let over_arm = geometry_of(&catalog, "brick_1x1", GridPosition::new(0, 3, 1), Rotation::Deg0);
        assert!(check_support(&view, &over_arm, None));
    }

    #[test]
    fn test_excluded_brick_does_not_support() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(&catalog, &[("brick_2x2", (0, 0, 0), Rotation::Deg0)]);
        let base_id = view.iter().next().unwrap().instance.id;

        let g = geometry_of(&catalog, "brick_1x1", GridPosition::new(0, 3, 0), Rotation::Deg0);
        assert!(check_support(&view, &g, None));
        assert!(!check_support(&view, &g, Some(base_id)));
    }

    #[test]
    fn test_find_unsupported() {
        let catalog = InMemoryCatalog::with_builtin_types();
        let view = view_of(
            &catalog,
            &[
                ("brick_2x2", (0, 0, 0), Rotation::Deg0),
                ("brick_2x2", (0, 3, 0), Rotation::Deg0),
                ("brick_1x1", (10, 6, 10), Rotation::Deg0),
            ],
        );
        let floating = view.iter().nth(2).unwrap().instance.id;
        assert_eq!(find_unsupported(&view), vec![floating]);
    }
}
