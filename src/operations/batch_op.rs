//! PLACE_BATCH operation builder.

use crate::error::ValidationError;
use crate::ir::{BatchPayload, Mutation, MutationRequest, PlacePayload, MAX_BATCH_SIZE};

use super::PlaceBuilder;

/// Builder for PLACE_BATCH requests.
///
/// # Example
/// ```rust,ignore
/// let request = BatchBuilder::new()
///     .add(PlaceBuilder::new().brick_type("brick_2x4").at(0, 0, 0))
///     .add(PlaceBuilder::new().brick_type("brick_2x4").at(0, 3, 0))
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchBuilder {
    entries: Vec<PlaceBuilder>,
    default_color: Option<String>,
}

impl BatchBuilder {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate.
    #[must_use]
    pub fn add(mut self, brick: PlaceBuilder) -> Self {
        self.entries.push(brick);
        self
    }

    /// Color applied to entries that set none.
    #[must_use]
    pub fn default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = Some(color.into());
        self
    }

    /// Build the PLACE_BATCH request.
    ///
    /// # Errors
    /// `MissingField` for an empty batch, `BatchTooLarge` above the hard
    /// limit, or the first invalid entry.
    pub fn build(self) -> Result<MutationRequest, ValidationError> {
        if self.entries.is_empty() {
            return Err(ValidationError::MissingField {
                field: "bricks".to_string(),
            });
        }

        let bricks = self
            .entries
            .into_iter()
            .map(|entry| {
                let mut payload = entry.build_payload()?;
                if payload.color.is_none() {
                    payload.color.clone_from(&self.default_color);
                }
                Ok(payload)
            })
            .collect::<Result<Vec<PlacePayload>, ValidationError>>()?;

        let payload = BatchPayload { bricks };
        payload.validate(MAX_BATCH_SIZE)?;
        Ok(MutationRequest::new(Mutation::PlaceBatch(payload)))
    }
}
