//! Brick type catalog.
//!
//! Maps type ids to shape metadata: plan size, stack height, category and
//! blockout zones. Pure lookup.

mod builtin;
mod registry;
mod types;

pub use builtin::{builtin_types, BRICK_HEIGHT, PLATE_HEIGHT};
pub use registry::{CatalogError, InMemoryCatalog, TypeCatalog};
pub use types::{
    BlockoutZone, BrickCategory, BrickTypeDefinition, FootprintShape, MAX_TYPE_ID_LENGTH,
};
