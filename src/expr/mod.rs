//! Upstream expression types.
//!
//! This module provides the problem-side building blocks the adapter consumes:
//! - `Variable` - a single flat block of decision variables
//! - `AffineExpr` - affine forms `M * x + o` with coefficient extraction
//! - `VariableId` / `ConstraintId` - identities results are keyed by

pub mod affine;
pub mod variable;

pub use affine::AffineExpr;
pub use variable::{variable, ConstraintId, Variable, VariableId};
