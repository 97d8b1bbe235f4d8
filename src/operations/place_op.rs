//! PLACE operation builder.

use crate::error::ValidationError;
use crate::geometry::{GridPosition, Rotation};
use crate::ir::{Mutation, MutationRequest, PlacePayload};

/// Builder for PLACE requests.
///
/// # Example
/// ```rust,ignore
/// let request = PlaceBuilder::new()
///     .brick_type("brick_2x4")
///     .at(0, 0, 0)
///     .rotation(Rotation::Deg90)
///     .color("#ffffff")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlaceBuilder {
    type_id: Option<String>,
    position: Option<GridPosition>,
    rotation: Rotation,
    color: Option<String>,
}

impl PlaceBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the brick type (required).
    #[must_use]
    pub fn brick_type(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    /// Set the position (required).
    #[must_use]
    pub fn position(mut self, position: GridPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the position from coordinates (required).
    #[must_use]
    pub fn at(self, x: i32, y: i32, z: i32) -> Self {
        self.position(GridPosition::new(x, y, z))
    }

    /// Set the rotation (default: 0°).
    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the color (default: the engine's default color).
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Build the payload without wrapping it in a request.
    ///
    /// # Errors
    /// `MissingField` if type or position is not set, or any payload
    /// validation error.
    pub fn build_payload(self) -> Result<PlacePayload, ValidationError> {
        let type_id = self.type_id.ok_or_else(|| ValidationError::MissingField {
            field: "type_id".to_string(),
        })?;
        let position = self.position.ok_or_else(|| ValidationError::MissingField {
            field: "position".to_string(),
        })?;

        let payload = PlacePayload {
            type_id: type_id.trim().to_string(),
            position,
            rotation: self.rotation,
            color: self.color,
        };
        payload.validate()?;
        Ok(payload)
    }

    /// Build the PLACE request.
    ///
    /// # Errors
    /// Same as [`PlaceBuilder::build_payload`].
    pub fn build(self) -> Result<MutationRequest, ValidationError> {
        Ok(MutationRequest::new(Mutation::Place(self.build_payload()?)))
    }
}
