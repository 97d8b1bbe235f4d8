//! Intermediate Representation (IR) for scene mutations.
//!
//! The IR provides a serializable format for every mutation. This enables:
//! - Transport between a client and the process owning the scene
//! - Mutation logging and replay
//! - Debugging and inspection

mod import;
mod operations;
mod serialization;
mod validation;

pub use import::{parse_scene, RawBrick, RawScene};
pub use operations::{
    BatchPayload, ImportPayload, MovePayload, Mutation, MutationRequest, PaintPayload,
    PlacePayload, RemovePayload, RenamePayload, RotatePayload,
};

pub use serialization::{from_json, to_json_pretty};
pub use validation::{
    is_hex_color, validate_color, validate_name, MAX_BATCH_SIZE, MAX_IMPORT_BYTES, MAX_NAME_LEN,
};
