//! Append-only type registry.
//!
//! The placement pipeline only ever sees a [`TypeCatalog`] handle, so types
//! can come from a compiled-in table, a file, or a stream of newly seen ids
//! without the geometry code knowing the difference.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::catalog::builtin::builtin_types;
use crate::catalog::types::{BrickCategory, BrickTypeDefinition};
use crate::error::ValidationError;

/// Errors raised by a type catalog backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The id is already registered with a different definition.
    #[error("Brick type '{type_id}' is already registered with a different shape")]
    Conflict {
        /// Conflicting type id.
        type_id: String,
    },

    /// The definition failed validation.
    #[error("Invalid definition: {0}")]
    Invalid(#[from] ValidationError),

    /// Backend error.
    #[error("Catalog backend error: {0}")]
    BackendError(String),
}

/// Lookup capability for brick types.
///
/// Registration is append-only: definitions are never mutated or removed.
pub trait TypeCatalog: Send + Sync {
    /// Looks up a type by id.
    fn get(&self, type_id: &str) -> Result<Option<Arc<BrickTypeDefinition>>, CatalogError>;

    /// All registered types in registration order.
    fn list(&self) -> Result<Vec<Arc<BrickTypeDefinition>>, CatalogError>;

    /// Registers a type.
    ///
    /// Registering an id again with an identical definition returns the
    /// existing entry.
    ///
    /// # Errors
    /// - `Invalid`: the definition fails [`BrickTypeDefinition::validate`]
    /// - `Conflict`: the id exists with a different definition
    fn register(
        &self,
        definition: BrickTypeDefinition,
    ) -> Result<Arc<BrickTypeDefinition>, CatalogError>;

    /// Returns true if the id is registered.
    fn contains(&self, type_id: &str) -> Result<bool, CatalogError> {
        Ok(self.get(type_id)?.is_some())
    }
}

fn lock_err(context: &'static str) -> CatalogError {
    CatalogError::BackendError(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct CatalogState {
    by_id: HashMap<String, Arc<BrickTypeDefinition>>,
    order: Vec<Arc<BrickTypeDefinition>>,
}

/// Thread-safe in-memory catalog.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded with the standard brick types.
    #[must_use]
    pub fn with_builtin_types() -> Self {
        let mut state = CatalogState::default();
        for definition in builtin_types() {
            let definition = Arc::new(definition);
            state.by_id.insert(definition.id.clone(), Arc::clone(&definition));
            state.order.push(definition);
        }
        Self {
            state: RwLock::new(state),
        }
    }

    /// Registered types grouped by category, each group in registration order.
    ///
    /// # Errors
    /// Returns `BackendError` if the catalog lock is poisoned.
    pub fn by_category(
        &self,
    ) -> Result<BTreeMap<BrickCategory, Vec<Arc<BrickTypeDefinition>>>, CatalogError> {
        let state = self.state.read().map_err(|_| lock_err("catalog.by_category"))?;
        let mut groups: BTreeMap<BrickCategory, Vec<Arc<BrickTypeDefinition>>> = BTreeMap::new();
        for definition in &state.order {
            groups
                .entry(definition.category)
                .or_default()
                .push(Arc::clone(definition));
        }
        Ok(groups)
    }

    /// Number of registered types.
    ///
    /// # Errors
    /// Returns `BackendError` if the catalog lock is poisoned.
    pub fn len(&self) -> Result<usize, CatalogError> {
        let state = self.state.read().map_err(|_| lock_err("catalog.len"))?;
        Ok(state.order.len())
    }

    /// Returns true if no types are registered.
    ///
    /// # Errors
    /// Returns `BackendError` if the catalog lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.len()? == 0)
    }
}

impl TypeCatalog for InMemoryCatalog {
    fn get(&self, type_id: &str) -> Result<Option<Arc<BrickTypeDefinition>>, CatalogError> {
        let state = self.state.read().map_err(|_| lock_err("catalog.get"))?;
        Ok(state.by_id.get(type_id).cloned())
    }

    fn list(&self) -> Result<Vec<Arc<BrickTypeDefinition>>, CatalogError> {
        let state = self.state.read().map_err(|_| lock_err("catalog.list"))?;
        Ok(state.order.clone())
    }

    fn register(
        &self,
        definition: BrickTypeDefinition,
    ) -> Result<Arc<BrickTypeDefinition>, CatalogError> {
        definition.validate()?;

        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("catalog.register"))?;
        if let Some(existing) = state.by_id.get(&definition.id) {
            if **existing == definition {
                return Ok(Arc::clone(existing));
            }
            return Err(CatalogError::Conflict {
                type_id: definition.id,
            });
        }

        tracing::debug!(type_id = %definition.id, category = %definition.category, "registered brick type");
        let definition = Arc::new(definition);
        state.by_id.insert(definition.id.clone(), Arc::clone(&definition));
        state.order.push(Arc::clone(&definition));
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: &str, x: i32, z: i32) -> BrickTypeDefinition {
        BrickTypeDefinition::new(id, id, BrickCategory::Generic, x, z, 3)
    }

    #[test]
    fn test_register_and_get() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.is_empty().unwrap());

        let registered = catalog.register(part("part_a", 2, 2)).unwrap();
        assert_eq!(registered.id, "part_a");
        assert!(catalog.contains("part_a").unwrap());
        assert!(!catalog.contains("part_b").unwrap());
        assert_eq!(catalog.get("part_a").unwrap().unwrap().studs_x, 2);
    }

    #[test]
    fn test_identical_reregistration_is_noop() {
        let catalog = InMemoryCatalog::new();
        let first = catalog.register(part("part_a", 2, 2)).unwrap();
        let second = catalog.register(part("part_a", 2, 2)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.len().unwrap(), 1);
    }

    #[test]
    fn test_conflicting_reregistration_fails() {
        let catalog = InMemoryCatalog::new();
        catalog.register(part("part_a", 2, 2)).unwrap();
        let err = catalog.register(part("part_a", 2, 4)).unwrap_err();
        assert_eq!(
            err,
            CatalogError::Conflict {
                type_id: "part_a".to_string()
            }
        );
        assert_eq!(catalog.get("part_a").unwrap().unwrap().studs_z, 2);
    }

    #[test]
    fn test_invalid_definition_rejected() {
        let catalog = InMemoryCatalog::new();
        let err = catalog.register(part("bad", 0, 2)).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
        assert!(catalog.is_empty().unwrap());
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let catalog = InMemoryCatalog::new();
        catalog.register(part("zeta", 1, 1)).unwrap();
        catalog.register(part("alpha", 1, 1)).unwrap();
        let ids: Vec<_> = catalog.list().unwrap().iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_builtin_catalog_groups() {
        let catalog = InMemoryCatalog::with_builtin_types();
        assert_eq!(catalog.len().unwrap(), 36);

        let groups = catalog.by_category().unwrap();
        assert_eq!(groups[&BrickCategory::Brick].len(), 11);
        assert_eq!(groups[&BrickCategory::Plate].len(), 17);
        assert_eq!(groups[&BrickCategory::Technic].len(), 5);
        assert_eq!(groups[&BrickCategory::Slope].len(), 1);
        assert_eq!(groups[&BrickCategory::Corner].len(), 2);
        assert!(!groups.contains_key(&BrickCategory::Generic));
    }
}
