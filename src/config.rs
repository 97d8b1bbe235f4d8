//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ir::{validate_color, validate_name, MAX_BATCH_SIZE};

/// Tunables for a scene engine and its runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Side length of the square building area, in studs.
    pub building_size: i32,
    /// Color given to bricks placed or imported without one.
    pub default_color: String,
    /// Name of a newly created scene.
    pub default_scene_name: String,
    /// Largest accepted batch request.
    pub max_batch_size: usize,
    /// Pending requests per scene in the runtime before `QueueFull`.
    pub queue_capacity: usize,
    /// Buffered events per change-feed subscriber.
    pub event_stream_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            building_size: 48,
            default_color: "#cc0000".to_string(),
            default_scene_name: "Untitled".to_string(),
            max_batch_size: 1024,
            queue_capacity: 256,
            event_stream_capacity: 1024,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// `InvalidConfig` for malformed TOML or out-of-range values.
    pub fn from_toml_str(s: &str) -> Result<Self, ValidationError> {
        let config: Self = toml::from_str(s).map_err(|e| ValidationError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    /// `InvalidConfig` if the file cannot be read or is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ValidationError::InvalidConfig {
            reason: format!("read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    /// `InvalidConfig` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ValidationError> {
        toml::to_string_pretty(self).map_err(|e| ValidationError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// `InvalidConfig` naming the first bad field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidConfig { reason };

        if self.building_size <= 0 {
            return Err(invalid(format!(
                "building_size must be positive, got {}",
                self.building_size
            )));
        }
        if self.max_batch_size == 0 || self.max_batch_size > MAX_BATCH_SIZE {
            return Err(invalid(format!(
                "max_batch_size must be in 1..={MAX_BATCH_SIZE}, got {}",
                self.max_batch_size
            )));
        }
        if self.queue_capacity == 0 {
            return Err(invalid("queue_capacity must be positive".to_string()));
        }
        if self.event_stream_capacity == 0 {
            return Err(invalid("event_stream_capacity must be positive".to_string()));
        }
        validate_color(&self.default_color)
            .map_err(|e| invalid(format!("default_color: {e}")))?;
        validate_name(&self.default_scene_name)
            .map_err(|e| invalid(format!("default_scene_name: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.building_size, 48);
        assert_eq!(config.default_color, "#cc0000");
        assert_eq!(config.default_scene_name, "Untitled");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("building_size = 32\nqueue_capacity = 8\n").unwrap();
        assert_eq!(config.building_size, 32);
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.max_batch_size, 1024);

        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        for toml in [
            "building_size = 0",
            "max_batch_size = 0",
            "queue_capacity = 0",
            "event_stream_capacity = 0",
            "default_color = \"red\"",
            "default_scene_name = \"  \"",
            "building_size = \"big\"",
        ] {
            assert!(
                matches!(
                    EngineConfig::from_toml_str(toml),
                    Err(ValidationError::InvalidConfig { .. })
                ),
                "{toml}"
            );
        }
    }

    #[test]
    fn test_from_file_roundtrip() {
        let config = EngineConfig {
            building_size: 64,
            ..EngineConfig::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(format!("{err}").contains("absent.toml"));
    }
}
