//! IR validation.
//!
//! Builders already validate inputs, but payloads deserialized from JSON
//! must be checked again before execution.

use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::MAX_TYPE_ID_LENGTH;
use crate::error::ValidationError;
use crate::ir::operations::{
    BatchPayload, ImportPayload, Mutation, MutationRequest, PaintPayload, PlacePayload,
    RenamePayload,
};

/// Upper bound for scene names.
pub const MAX_NAME_LEN: usize = 256;

/// Upper bound for raw import documents.
pub const MAX_IMPORT_BYTES: usize = 4 * 1024 * 1024;

/// Hard upper bound for batch requests, regardless of configuration.
pub const MAX_BATCH_SIZE: usize = 4096;

static HEX_COLOR: OnceLock<Option<Regex>> = OnceLock::new();

/// Returns true if `value` is a `#rrggbb` hex color.
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR
        .get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// Validates a `#rrggbb` color.
///
/// # Errors
/// Returns `InvalidColor` for anything else.
pub fn validate_color(value: &str) -> Result<(), ValidationError> {
    if is_hex_color(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidColor {
            value: value.to_string(),
        })
    }
}

/// Validates a scene name: non-empty after trimming and bounded.
///
/// # Errors
/// `MissingField` or `FieldTooLong`.
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    validate_non_empty("name", value, MAX_NAME_LEN)
}

fn validate_non_empty(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }
    if v.chars().count() > max {
        return Err(ValidationError::FieldTooLong {
            field: field.to_string(),
            max_length: max,
        });
    }
    Ok(())
}

impl PlacePayload {
    /// Validates this payload.
    ///
    /// # Errors
    /// Empty or oversized type id, or a malformed color.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_empty("type_id", &self.type_id, MAX_TYPE_ID_LENGTH)?;
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

impl PaintPayload {
    /// Validates this payload.
    ///
    /// # Errors
    /// A malformed color.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_color(&self.color)
    }
}

impl ImportPayload {
    /// Validates this payload.
    ///
    /// The document itself is parsed at execution time.
    ///
    /// # Errors
    /// An empty or oversized document.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.scene_json.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "scene_json".to_string(),
            });
        }
        if self.scene_json.len() > MAX_IMPORT_BYTES {
            return Err(ValidationError::FieldTooLong {
                field: "scene_json".to_string(),
                max_length: MAX_IMPORT_BYTES,
            });
        }
        Ok(())
    }
}

impl BatchPayload {
    /// Validates this payload against `max_batch_size`.
    ///
    /// # Errors
    /// An oversized batch or an invalid entry.
    pub fn validate(&self, max_batch_size: usize) -> Result<(), ValidationError> {
        let max = max_batch_size.min(MAX_BATCH_SIZE);
        if self.bricks.len() > max {
            return Err(ValidationError::BatchTooLarge {
                actual: self.bricks.len(),
                max,
            });
        }
        for brick in &self.bricks {
            brick.validate()?;
        }
        Ok(())
    }
}

impl RenamePayload {
    /// Validates this payload.
    ///
    /// # Errors
    /// `MissingField` or `FieldTooLong`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

impl Mutation {
    /// Validates the mutation payload.
    ///
    /// # Errors
    /// The first invalid field.
    pub fn validate(&self, max_batch_size: usize) -> Result<(), ValidationError> {
        match self {
            Self::Place(p) => p.validate(),
            Self::Paint(p) => p.validate(),
            Self::Import(p) => p.validate(),
            Self::PlaceBatch(p) => p.validate(max_batch_size),
            Self::Rename(p) => p.validate(),
            Self::Move(_) | Self::Rotate(_) | Self::Remove(_) | Self::Clear => Ok(()),
        }
    }
}

impl MutationRequest {
    /// Validates the envelope and its mutation.
    ///
    /// # Errors
    /// A missing protocol version or an invalid mutation.
    pub fn validate(&self, max_batch_size: usize) -> Result<(), ValidationError> {
        validate_non_empty("version", &self.version, 16)?;
        self.mutation.validate(max_batch_size)
    }
}
