//! Brick type metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geometry::Rotation;

/// Maximum length of a type id.
pub const MAX_TYPE_ID_LENGTH: usize = 128;

/// Category tag of a brick type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrickCategory {
    /// Ordinary block, three plates tall.
    Brick,
    /// Thin block, one plate tall.
    Plate,
    /// Sloped block with an angled face.
    Slope,
    /// Perforated mechanical block.
    Technic,
    /// L-shaped corner block.
    Corner,
    /// Anything registered at runtime without a known category.
    Generic,
}

impl BrickCategory {
    /// All categories in listing order.
    pub const ALL: [Self; 6] = [
        Self::Brick,
        Self::Plate,
        Self::Slope,
        Self::Technic,
        Self::Corner,
        Self::Generic,
    ];

    /// Physical contact shape of types in this category.
    #[must_use]
    pub const fn footprint_shape(self) -> FootprintShape {
        match self {
            Self::Corner => FootprintShape::Corner,
            Self::Brick | Self::Plate | Self::Slope | Self::Technic | Self::Generic => {
                FootprintShape::Rectangle
            }
        }
    }

    /// Lowercase tag as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brick => "brick",
            Self::Plate => "plate",
            Self::Slope => "slope",
            Self::Technic => "technic",
            Self::Corner => "corner",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for BrickCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a type's plan decomposes into contact boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootprintShape {
    /// A single box covering the whole plan.
    Rectangle,
    /// Two arms forming an L, with one empty corner cell.
    Corner,
}

/// A local-space rectangle above the type's top surface that carries no studs.
///
/// Coordinates are relative to the unrotated plan, `0..studs_x` by `0..studs_z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockoutZone {
    #[allow(missing_docs)]
    pub min_x: i32,
    #[allow(missing_docs)]
    pub max_x: i32,
    #[allow(missing_docs)]
    pub min_z: i32,
    #[allow(missing_docs)]
    pub max_z: i32,
    /// Vertical extent above the top surface.
    pub height: i32,
}

/// Immutable shape metadata of one brick type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickTypeDefinition {
    /// Catalog key, e.g. `brick_2x4`.
    pub id: String,
    /// Display name, e.g. `2×4 Brick`.
    #[serde(default)]
    pub name: String,
    /// Category tag.
    #[serde(default = "default_category")]
    pub category: BrickCategory,
    /// Plan size along X before rotation.
    #[serde(alias = "studsX")]
    pub studs_x: i32,
    /// Plan size along Z before rotation.
    #[serde(alias = "studsZ")]
    pub studs_z: i32,
    /// Stack height in plate units.
    #[serde(alias = "heightUnits")]
    pub height_units: i32,
    /// Regions above the top surface without studs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blockout: Vec<BlockoutZone>,
}

const fn default_category() -> BrickCategory {
    BrickCategory::Generic
}

impl BrickTypeDefinition {
    /// Creates a definition without blockout zones.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: BrickCategory,
        studs_x: i32,
        studs_z: i32,
        height_units: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            studs_x,
            studs_z,
            height_units,
            blockout: Vec::new(),
        }
    }

    /// Adds a blockout zone.
    #[must_use]
    pub fn with_blockout(mut self, zone: BlockoutZone) -> Self {
        self.blockout.push(zone);
        self
    }

    /// Physical contact shape of this type.
    #[must_use]
    pub const fn shape(&self) -> FootprintShape {
        self.category.footprint_shape()
    }

    /// Plan size `(x, z)` after applying `rotation`.
    #[must_use]
    pub const fn plan_size(&self, rotation: Rotation) -> (i32, i32) {
        if rotation.swaps_axes() {
            (self.studs_z, self.studs_x)
        } else {
            (self.studs_x, self.studs_z)
        }
    }

    /// Validates the definition before it enters a catalog.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidBrickType` for non-positive sizes,
    /// corner types narrower than two studs, and blockout zones that are
    /// empty or leave the type's plan.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidBrickType {
            type_id: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "id".to_string(),
            });
        }
        if self.id.len() > MAX_TYPE_ID_LENGTH {
            return Err(ValidationError::FieldTooLong {
                field: "id".to_string(),
                max_length: MAX_TYPE_ID_LENGTH,
            });
        }
        if self.studs_x <= 0 || self.studs_z <= 0 {
            return Err(invalid(format!(
                "plan size {}x{} must be positive",
                self.studs_x, self.studs_z
            )));
        }
        if self.height_units <= 0 {
            return Err(invalid(format!(
                "height {} must be positive",
                self.height_units
            )));
        }
        if self.shape() == FootprintShape::Corner && (self.studs_x < 2 || self.studs_z < 2) {
            return Err(invalid("corner types need at least 2 studs per side".to_string()));
        }

        for (i, zone) in self.blockout.iter().enumerate() {
            if zone.min_x >= zone.max_x || zone.min_z >= zone.max_z {
                return Err(invalid(format!("blockout zone {i} has no area")));
            }
            if zone.height <= 0 {
                return Err(invalid(format!("blockout zone {i} has no height")));
            }
            if zone.min_x < 0
                || zone.min_z < 0
                || zone.max_x > self.studs_x
                || zone.max_z > self.studs_z
            {
                return Err(invalid(format!("blockout zone {i} leaves the plan")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_accepts_camel_case_fields() {
        let json = r#"{
            "id": "slope_2x2",
            "name": "2x2 Slope",
            "category": "slope",
            "studsX": 2,
            "studsZ": 2,
            "heightUnits": 3,
            "blockout": [{"minX": 0, "maxX": 2, "minZ": 1, "maxZ": 2, "height": 3}]
        }"#;
        let def: BrickTypeDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.category, BrickCategory::Slope);
        assert_eq!(def.blockout.len(), 1);
        assert_eq!(def.blockout[0].min_z, 1);
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_missing_category_is_generic() {
        let json = r#"{"id": "part_3001", "studs_x": 2, "studs_z": 4, "height_units": 3}"#;
        let def: BrickTypeDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.category, BrickCategory::Generic);
        assert_eq!(def.shape(), FootprintShape::Rectangle);
    }

    #[test]
    fn test_plan_size_swaps() {
        let def = BrickTypeDefinition::new("plate_12x4", "", BrickCategory::Plate, 12, 4, 1);
        assert_eq!(def.plan_size(Rotation::Deg0), (12, 4));
        assert_eq!(def.plan_size(Rotation::Deg270), (4, 12));
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let zero = BrickTypeDefinition::new("x", "", BrickCategory::Brick, 0, 2, 3);
        assert!(matches!(
            zero.validate(),
            Err(ValidationError::InvalidBrickType { .. })
        ));

        let flat = BrickTypeDefinition::new("x", "", BrickCategory::Brick, 1, 1, 0);
        assert!(flat.validate().is_err());

        let thin_corner = BrickTypeDefinition::new("c", "", BrickCategory::Corner, 1, 3, 3);
        assert!(thin_corner.validate().is_err());

        let unnamed = BrickTypeDefinition::new("  ", "", BrickCategory::Brick, 1, 1, 3);
        assert!(matches!(
            unnamed.validate(),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_blockouts() {
        let base = BrickTypeDefinition::new("s", "", BrickCategory::Slope, 2, 2, 3);
        let zone = |min_x, max_x, min_z, max_z, height| BlockoutZone {
            min_x,
            max_x,
            min_z,
            max_z,
            height,
        };

        assert!(base.clone().with_blockout(zone(0, 2, 1, 2, 3)).validate().is_ok());
        assert!(base.clone().with_blockout(zone(1, 1, 0, 2, 3)).validate().is_err());
        assert!(base.clone().with_blockout(zone(0, 2, 0, 2, 0)).validate().is_err());
        assert!(base.with_blockout(zone(0, 3, 0, 2, 3)).validate().is_err());
    }

    #[test]
    fn test_only_corner_category_is_l_shaped() {
        for category in BrickCategory::ALL {
            let expected = if category == BrickCategory::Corner {
                FootprintShape::Corner
            } else {
                FootprintShape::Rectangle
            };
            assert_eq!(category.footprint_shape(), expected);
        }
    }
}
