use std::sync::Arc;

use brickyard::catalog::InMemoryCatalog;
use brickyard::engine::EngineResponse;
use brickyard::geometry::{BrickGeometry, FootprintSummary};
use brickyard::placement::{check_support, find_unsupported, SceneView};
use brickyard::{
    Axis, BrickError, BrickInstance, EngineConfig, GridPosition, InMemorySceneStore, PlacementError,
    PlacementErrorKind, Rotation, SceneEngine, TypeCatalog,
};

fn at(x: i32, y: i32, z: i32) -> GridPosition {
    GridPosition::new(x, y, z)
}

fn place(engine: &SceneEngine, type_id: &str, pos: GridPosition, rotation: Rotation) -> BrickInstance {
    engine
        .place(type_id, pos, rotation, None)
        .unwrap()
        .brick()
        .cloned()
        .unwrap()
}

fn rejection(result: Result<EngineResponse, BrickError>) -> PlacementErrorKind {
    result.unwrap_err().placement_kind().expect("placement rejection")
}

/// Every brick is supported by the rest of the scene and no two footprints overlap.
fn assert_scene_valid(engine: &SceneEngine) {
    let scene = engine.scene().unwrap();
    let view = SceneView::resolve(&scene.bricks, engine.catalog()).unwrap();

    assert!(find_unsupported(&view).is_empty(), "unsupported brick in scene");
    for placed in view.iter() {
        assert!(check_support(&view, &placed.geometry, Some(placed.instance.id)));
    }

    let bricks: Vec<_> = view.iter().collect();
    for (i, a) in bricks.iter().enumerate() {
        for b in &bricks[i + 1..] {
            assert!(
                !a.geometry.footprint_overlaps(&b.geometry),
                "{} overlaps {}",
                a.instance.describe(),
                b.instance.describe()
            );
        }
    }
}

#[test]
fn footprint_of_2x4_swaps_on_rotation() {
    let engine = SceneEngine::in_memory();

    let EngineResponse::Placed { footprint, .. } = engine
        .place("brick_2x4", at(0, 0, 0), Rotation::Deg0, None)
        .unwrap()
    else {
        panic!("expected Placed");
    };
    assert_eq!(
        footprint,
        FootprintSummary {
            min_x: 0,
            max_x: 2,
            min_z: 0,
            max_z: 4,
            top_y: 3
        }
    );

    engine.clear().unwrap();
    let EngineResponse::Placed { footprint, .. } = engine
        .place("brick_2x4", at(0, 0, 0), Rotation::Deg90, None)
        .unwrap()
    else {
        panic!("expected Placed");
    };
    assert_eq!(
        footprint,
        FootprintSummary {
            min_x: 0,
            max_x: 4,
            min_z: 0,
            max_z: 2,
            top_y: 3
        }
    );
}

#[test]
fn floating_placement_is_unsupported() {
    let engine = SceneEngine::in_memory();
    let catalog = InMemoryCatalog::with_builtin_types();
    for definition in catalog.list().unwrap() {
        let kind = rejection(engine.place(definition.id.clone(), at(10, 3, 10), Rotation::Deg0, None));
        assert_eq!(kind, PlacementErrorKind::Unsupported, "{}", definition.id);
    }
    assert_eq!(engine.version().unwrap(), 0);
}

#[test]
fn removing_base_cascades_brick_above() {
    let engine = SceneEngine::in_memory();
    let a = place(&engine, "brick_2x2", at(0, 0, 0), Rotation::Deg0);
    let b = place(&engine, "brick_2x2", at(1, 3, 1), Rotation::Deg0);

    let EngineResponse::Removed {
        removed,
        cascade_removed,
        version,
    } = engine.remove(a.id).unwrap()
    else {
        panic!("expected Removed");
    };
    assert_eq!(removed.id, a.id);
    assert_eq!(cascade_removed, vec![b.id]);
    // One bump for the removal and its cascade.
    assert_eq!(version, 3);
    assert!(engine.scene().unwrap().is_empty());
}

#[test]
fn cascade_reaches_fixed_point() {
    let engine = SceneEngine::in_memory();
    let base = place(&engine, "brick_1x1", at(4, 0, 4), Rotation::Deg0);
    let mut tower = Vec::new();
    for level in 1..=4 {
        tower.push(place(&engine, "brick_1x1", at(4, level * 3, 4), Rotation::Deg0).id);
    }
    let bystander = place(&engine, "brick_2x2", at(10, 0, 10), Rotation::Deg0);

    let response = engine.remove(base.id).unwrap();
    assert_eq!(response.cascade_removed(), tower.as_slice());
    // Six placements, then a single bump for the removal and its cascade.
    assert_eq!(response.version(), 7);

    let scene = engine.scene().unwrap();
    assert_eq!(scene.bricks, vec![bystander]);
}

#[test]
fn identical_bricks_collide() {
    let engine = SceneEngine::in_memory();
    let first = place(&engine, "brick_1x1", at(7, 0, 7), Rotation::Deg0);

    let err = engine
        .place("brick_1x1", at(7, 0, 7), Rotation::Deg0, None)
        .unwrap_err();
    let BrickError::Placement(PlacementError::Collision { blocking, .. }) = err else {
        panic!("expected Collision");
    };
    assert_eq!(blocking, Some(first.id));
}

#[test]
fn slope_face_rejects_but_flat_top_accepts() {
    let engine = SceneEngine::in_memory();
    place(&engine, "slope_2x2", at(0, 0, 0), Rotation::Deg0);

    let kind = rejection(engine.place("brick_1x1", at(0, 3, 1), Rotation::Deg0, None));
    assert_eq!(kind, PlacementErrorKind::Collision);

    assert!(engine
        .place("brick_1x1", at(0, 3, 0), Rotation::Deg0, None)
        .is_ok());
    assert_scene_valid(&engine);
}

#[test]
fn failed_corner_rotation_leaves_brick_unchanged() {
    let engine = SceneEngine::in_memory();
    place(&engine, "brick_1x1", at(1, 0, 0), Rotation::Deg0);
    let corner = place(&engine, "corner_2x2", at(0, 3, 0), Rotation::Deg0);
    let version = engine.version().unwrap();

    // At 90° the notch lands on the only supporting stud.
    let kind = rejection(engine.rotate(corner.id, Rotation::Deg90));
    assert_eq!(kind, PlacementErrorKind::Unsupported);

    let scene = engine.scene().unwrap();
    assert_eq!(scene.get(corner.id).unwrap().rotation, Rotation::Deg0);
    assert_eq!(scene.version, version);

    // 180° keeps the arm over the stud.
    assert!(engine.rotate(corner.id, Rotation::Deg180).is_ok());
}

#[test]
fn check_order_reports_first_failure() {
    let engine = SceneEngine::in_memory();
    place(&engine, "brick_1x1", at(0, 0, 0), Rotation::Deg0);

    // Unknown type wins over everything else.
    let kind = rejection(engine.place("brick_99x99", at(100, 7, 100), Rotation::Deg0, None));
    assert_eq!(kind, PlacementErrorKind::UnknownBrickType);

    // Out of bounds and floating: bounds first.
    let err = engine
        .place("brick_2x4", at(47, 9, 0), Rotation::Deg0, None)
        .unwrap_err();
    let BrickError::Placement(PlacementError::OutOfBounds { axis, .. }) = err else {
        panic!("expected OutOfBounds");
    };
    assert_eq!(axis, Axis::X);

    // Below ground.
    let kind = rejection(engine.place("brick_1x1", at(3, -3, 3), Rotation::Deg0, None));
    assert_eq!(kind, PlacementErrorKind::OutOfBounds);

    // Floating and not overlapping anything: support before collision.
    let kind = rejection(engine.place("brick_1x1", at(5, 6, 5), Rotation::Deg0, None));
    assert_eq!(kind, PlacementErrorKind::Unsupported);
}

#[test]
fn rejections_echo_attempted_parameters() {
    let engine = SceneEngine::in_memory();
    let err = engine
        .place("plate_2x2", at(2, 5, 9), Rotation::Deg270, None)
        .unwrap_err();
    let BrickError::Placement(rejection) = err else {
        panic!("expected placement rejection");
    };
    assert_eq!(rejection.type_id(), "plate_2x2");
    assert_eq!(rejection.position(), at(2, 5, 9));
}

#[test]
fn building_size_comes_from_config() {
    let config = EngineConfig {
        building_size: 8,
        ..EngineConfig::default()
    };
    let engine = SceneEngine::in_memory_with_config(config).unwrap();

    assert!(engine
        .place("brick_2x4", at(6, 0, 4), Rotation::Deg0, None)
        .is_ok());
    let kind = rejection(engine.place("brick_2x4", at(6, 0, 5), Rotation::Deg0, None));
    assert_eq!(kind, PlacementErrorKind::OutOfBounds);
}

#[test]
fn extreme_coordinates_are_out_of_bounds() {
    let engine = SceneEngine::in_memory();
    let cases = [
        (at(i32::MAX, 0, 0), Axis::X),
        (at(0, 0, i32::MAX), Axis::Z),
        (at(i32::MIN, 0, 0), Axis::X),
        (at(0, i32::MAX, 0), Axis::Y),
        (at(0, i32::MAX - 1, 0), Axis::Y),
    ];

    for (pos, expected) in cases {
        for rotation in [Rotation::Deg0, Rotation::Deg90] {
            for type_id in ["brick_2x4", "slope_2x2", "corner_2x2"] {
                let err = engine.place(type_id, pos, rotation, None).unwrap_err();
                let BrickError::Placement(PlacementError::OutOfBounds { axis, .. }) = err else {
                    panic!("expected OutOfBounds for {type_id} at {pos}");
                };
                assert_eq!(axis, expected, "{type_id} at {pos}");
            }
        }
    }

    let base = place(&engine, "brick_1x1", at(0, 0, 0), Rotation::Deg0);
    let kind = rejection(engine.move_brick(base.id, at(i32::MAX, 0, 0)));
    assert_eq!(kind, PlacementErrorKind::OutOfBounds);
    assert_eq!(engine.version().unwrap(), 1);
}

#[test]
fn random_walk_keeps_scene_valid() {
    let engine = SceneEngine::in_memory();
    let types = ["brick_1x1", "brick_2x2", "brick_2x4", "plate_2x2", "slope_2x2", "corner_2x2"];

    // Deterministic pseudo-random sequence of mutations.
    let mut seed: u64 = 0x5eed;
    let mut next = |bound: u64| {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        (seed >> 33) % bound
    };

    for _ in 0..400 {
        let scene = engine.scene().unwrap();
        let choice = next(10);
        if choice < 6 || scene.is_empty() {
            let type_id = types[usize::try_from(next(types.len() as u64)).unwrap()];
            let x = i32::try_from(next(8)).unwrap();
            let z = i32::try_from(next(8)).unwrap();
            let y = i32::try_from(next(4)).unwrap() * 3;
            let rotation = Rotation::ALL[usize::try_from(next(4)).unwrap()];
            let _ = engine.place(type_id, at(x, y, z), rotation, None);
        } else {
            let index = usize::try_from(next(scene.len() as u64)).unwrap();
            let target = scene.bricks[index].clone();
            let _ = match choice {
                6 => engine.remove(target.id),
                7 => engine.rotate(target.id, target.rotation.next()),
                _ => engine.move_brick(
                    target.id,
                    at(
                        i32::try_from(next(8)).unwrap(),
                        target.position.y,
                        i32::try_from(next(8)).unwrap(),
                    ),
                ),
            };
        }
        assert_scene_valid(&engine);
    }
}

#[test]
fn geometry_is_shared_with_clients() {
    // A client holding its own snapshot reaches the same verdict as the engine.
    let engine = SceneEngine::in_memory();
    place(&engine, "brick_2x4", at(0, 0, 0), Rotation::Deg0);

    let scene = engine.scene().unwrap();
    let catalog: Arc<dyn TypeCatalog> = Arc::new(InMemoryCatalog::with_builtin_types());
    let view = SceneView::resolve(&scene.bricks, catalog.as_ref()).unwrap();
    let definition = catalog.get("plate_1x1").unwrap().unwrap();
    let ghost = BrickGeometry::compute(&definition, at(1, 3, 3), Rotation::Deg0);
    assert!(check_support(&view, &ghost, None));

    let predicted = engine.preview_place("plate_1x1", at(1, 3, 3), Rotation::Deg0).unwrap();
    assert_eq!(predicted, FootprintSummary::from(ghost.aabb));
    assert_eq!(engine.version().unwrap(), 1);
}

#[test]
fn store_is_injected() {
    let store = Arc::new(InMemorySceneStore::new("shared"));
    let catalog: Arc<dyn TypeCatalog> = Arc::new(InMemoryCatalog::with_builtin_types());
    let a = SceneEngine::new(store.clone(), Arc::clone(&catalog), EngineConfig::default()).unwrap();
    let b = SceneEngine::new(store, catalog, EngineConfig::default()).unwrap();

    place(&a, "brick_1x1", at(0, 0, 0), Rotation::Deg0);
    let kind = rejection(b.place("brick_1x1", at(0, 0, 0), Rotation::Deg0, None));
    assert_eq!(kind, PlacementErrorKind::Collision);
    assert_eq!(b.scene().unwrap().name, "shared");
}
