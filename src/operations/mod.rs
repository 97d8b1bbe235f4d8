//! Request builders.
//!
//! Fluent, type-safe construction of mutation requests. Builders validate
//! their inputs before producing IR.

mod batch_op;
mod place_op;

pub use batch_op::BatchBuilder;
pub use place_op::PlaceBuilder;
