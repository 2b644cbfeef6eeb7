//! Constraints and the cones they map to.

pub mod constraint;

pub use constraint::{ConeKind, Constraint, ConstraintExt, ConstraintKind};
