//! Data-shape checks over a loaded dataset.

pub mod invariants;

pub use invariants::{validate_dataset, InvariantViolation, ViolationKind};
