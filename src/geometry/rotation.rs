//! Quarter-turn rotations about the vertical axis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Rotation of a brick about Y, restricted to quarter turns.
///
/// Serialized as the integer number of degrees. Deserialization also accepts
/// the strings `"0"`, `"90"`, `"180"` and `"270"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RotationRepr", into = "u16")]
pub enum Rotation {
    /// 0°
    #[default]
    Deg0,
    /// 90°
    Deg90,
    /// 180°
    Deg180,
    /// 270°
    Deg270,
}

impl Rotation {
    /// All rotations in ascending order.
    pub const ALL: [Self; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    /// Rotation in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// True when the rotation swaps the two horizontal plan dimensions.
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    /// The rotation reached by turning a further 90°.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    /// Rotates an offset from the footprint center.
    ///
    /// Matches a rotation by `-degrees` in the X/Z plane, which is how the
    /// rendered model turns.
    #[must_use]
    pub(crate) const fn rotate_offset(self, dx: i32, dz: i32) -> (i32, i32) {
        match self {
            Self::Deg0 => (dx, dz),
            Self::Deg90 => (dz, -dx),
            Self::Deg180 => (-dx, -dz),
            Self::Deg270 => (-dz, dx),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

impl TryFrom<i64> for Rotation {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(ValidationError::InvalidRotation {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = ValidationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl FromStr for Rotation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = trimmed
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidRotation {
                value: trimmed.to_string(),
            })?;
        Self::try_from(parsed)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RotationRepr {
    Int(i64),
    Text(String),
}

impl TryFrom<RotationRepr> for Rotation {
    type Error = ValidationError;

    fn try_from(value: RotationRepr) -> Result<Self, Self::Error> {
        match value {
            RotationRepr::Int(v) => Self::try_from(v),
            RotationRepr::Text(s) => s.parse(),
        }
    }
}
