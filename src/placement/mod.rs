//! Placement validation.
//!
//! Every check here is a pure function of a [`SceneView`] and a candidate,
//! so the same code runs authoritatively in the engine and predictively in
//! any client that holds a snapshot.
//!
//! Checks run in a fixed order and the first failure wins:
//! Type → Bounds → Support → Collision.

mod bounds;
mod collision;
mod support;

use std::sync::Arc;

use crate::catalog::{BrickTypeDefinition, TypeCatalog};
use crate::error::{BrickResult, PlacementError};
use crate::geometry::{BrickGeometry, GridPosition, Rotation};
use crate::scene::{BrickId, BrickInstance};

pub use bounds::{check_bounds, MAX_ELEVATION};
pub use collision::{check_collision, find_interpenetration, has_stud_support};
pub use support::{check_support, find_unsupported};

/// A brick resolved against the catalog, with its derived geometry.
#[derive(Debug, Clone)]
pub struct PlacedBrick {
    /// The brick itself.
    pub instance: BrickInstance,
    /// Its type.
    pub definition: Arc<BrickTypeDefinition>,
    /// Derived boxes at its current position and rotation.
    pub geometry: BrickGeometry,
}

impl PlacedBrick {
    /// Resolves geometry for an instance of a known type.
    #[must_use]
    pub fn new(instance: BrickInstance, definition: Arc<BrickTypeDefinition>) -> Self {
        let geometry = BrickGeometry::compute(&definition, instance.position, instance.rotation);
        Self {
            instance,
            definition,
            geometry,
        }
    }
}

/// Read-only geometric view of a scene.
///
/// Bricks whose type is not in the catalog are left out: they neither
/// support nor block anything, and are never cascaded.
#[derive(Debug, Clone, Default)]
pub struct SceneView {
    bricks: Vec<PlacedBrick>,
}

impl SceneView {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every brick against the catalog.
    ///
    /// # Errors
    /// Propagates catalog backend errors. Unknown types are skipped, not errors.
    pub fn resolve(bricks: &[BrickInstance], catalog: &dyn TypeCatalog) -> BrickResult<Self> {
        let mut resolved = Vec::with_capacity(bricks.len());
        for brick in bricks {
            if let Some(definition) = catalog.get(&brick.type_id)? {
                resolved.push(PlacedBrick::new(brick.clone(), definition));
            }
        }
        Ok(Self { bricks: resolved })
    }

    /// Iterates over resolved bricks in scene order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedBrick> {
        self.bricks.iter()
    }

    /// Iterates over every resolved brick except `exclude`.
    pub fn others(&self, exclude: Option<BrickId>) -> impl Iterator<Item = &PlacedBrick> {
        self.bricks
            .iter()
            .filter(move |b| Some(b.instance.id) != exclude)
    }

    /// Looks up a resolved brick.
    #[must_use]
    pub fn get(&self, id: BrickId) -> Option<&PlacedBrick> {
        self.bricks.iter().find(|b| b.instance.id == id)
    }

    /// Number of resolved bricks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    /// Returns true if no bricks resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Appends a brick.
    pub fn push(&mut self, brick: PlacedBrick) {
        self.bricks.push(brick);
    }

    /// Replaces the brick with the same id, or appends it.
    pub fn upsert(&mut self, brick: PlacedBrick) {
        match self.bricks.iter_mut().find(|b| b.instance.id == brick.instance.id) {
            Some(slot) => *slot = brick,
            None => self.bricks.push(brick),
        }
    }

    /// Drops every brick whose id is in `ids`.
    pub fn remove_all(&mut self, ids: &[BrickId]) {
        self.bricks.retain(|b| !ids.contains(&b.instance.id));
    }
}

/// Type, position and rotation of a brick that is not yet committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Catalog key.
    pub type_id: String,
    /// Minimum corner.
    pub position: GridPosition,
    /// Rotation.
    pub rotation: Rotation,
}

impl Candidate {
    /// Creates a candidate.
    #[must_use]
    pub fn new(type_id: impl Into<String>, position: GridPosition, rotation: Rotation) -> Self {
        Self {
            type_id: type_id.into(),
            position,
            rotation,
        }
    }
}

impl From<&BrickInstance> for Candidate {
    fn from(brick: &BrickInstance) -> Self {
        Self::new(brick.type_id.clone(), brick.position, brick.rotation)
    }
}

/// A candidate that passed every check.
#[derive(Debug, Clone)]
pub struct Validated {
    /// Resolved type.
    pub definition: Arc<BrickTypeDefinition>,
    /// Geometry at the candidate's position and rotation.
    pub geometry: BrickGeometry,
}

/// Runs the placement checks for an already resolved type.
///
/// `definition` is `None` when the type id is unknown. `exclude` is the id
/// of the brick being moved or rotated, which must not see itself.
///
/// When support fails and the candidate physically interpenetrates another
/// brick, the rejection is `Collision` naming that brick.
///
/// # Errors
/// The first failing check as a [`PlacementError`].
pub fn check_placement(
    view: &SceneView,
    definition: Option<&BrickTypeDefinition>,
    candidate: &Candidate,
    exclude: Option<BrickId>,
    building_size: i32,
) -> Result<BrickGeometry, PlacementError> {
    let Some(definition) = definition else {
        return Err(PlacementError::UnknownBrickType {
            type_id: candidate.type_id.clone(),
            position: candidate.position,
            rotation: candidate.rotation,
        });
    };

    let geometry = BrickGeometry::compute(definition, candidate.position, candidate.rotation);

    if let Some(axis) = check_bounds(&geometry.aabb, building_size) {
        return Err(PlacementError::OutOfBounds {
            type_id: candidate.type_id.clone(),
            position: candidate.position,
            rotation: candidate.rotation,
            axis,
            building_size,
        });
    }

    if !check_support(view, &geometry, exclude) {
        if let Some(blocking) = find_interpenetration(view, &geometry, exclude) {
            return Err(PlacementError::Collision {
                type_id: candidate.type_id.clone(),
                position: candidate.position,
                rotation: candidate.rotation,
                blocking: Some(blocking),
            });
        }
        return Err(PlacementError::Unsupported {
            type_id: candidate.type_id.clone(),
            position: candidate.position,
            rotation: candidate.rotation,
        });
    }

    if let Some(blocking) = check_collision(view, &geometry, exclude) {
        return Err(PlacementError::Collision {
            type_id: candidate.type_id.clone(),
            position: candidate.position,
            rotation: candidate.rotation,
            blocking: Some(blocking),
        });
    }

    Ok(geometry)
}

/// Resolves the candidate's type and runs [`check_placement`].
///
/// # Errors
/// - `Placement`: the candidate is rejected
/// - `Catalog`: the catalog backend failed
pub fn validate_candidate(
    view: &SceneView,
    catalog: &dyn TypeCatalog,
    candidate: &Candidate,
    exclude: Option<BrickId>,
    building_size: i32,
) -> BrickResult<Validated> {
    let Some(definition) = catalog.get(&candidate.type_id)? else {
        return Err(PlacementError::UnknownBrickType {
            type_id: candidate.type_id.clone(),
            position: candidate.position,
            rotation: candidate.rotation,
        }
        .into());
    };
    let geometry = check_placement(view, Some(&definition), candidate, exclude, building_size)?;
    Ok(Validated {
        definition,
        geometry,
    })
}
