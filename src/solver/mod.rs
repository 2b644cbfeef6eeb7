//! Solver interface for conif.
//!
//! This module provides:
//! - Constraint grouping and matrix stuffing into the ECOS convention
//! - The `Ecos` interface: `apply`, `solve_via_data`, `invert`
//! - Exit code translation and the `Solution` returned to callers
//! - A Clarabel backend that executes the ECOS convention

pub mod backend;
pub mod clarabel;
pub mod data;
pub mod ecos;
pub mod grouping;
pub mod options;
pub mod solution;
pub mod status;
pub mod stuffing;

pub use self::backend::ConeProgramBackend;
pub use self::clarabel::ClarabelBackend;
pub use self::data::{
    ConeDims, ConstraintLayout, InverseData, RawInfo, RawSolution, RawTiming, SolverData,
};
pub use self::ecos::{Ecos, EXP_CONE_ORDER, MIP_CAPABLE, SUPPORTED_CONSTRAINTS};
pub use self::grouping::{group_constraints, ConstraintGroups};
pub use self::options::{OptionValue, SolverOptions};
pub use self::solution::{SolveAttributes, Solution};
pub use self::status::{status_from_exit_code, SolveStatus, STATUS_MAP};
