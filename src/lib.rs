//! # conif
//!
//! A conic solver interface for the ECOS calling convention.
//!
//! conif translates a solver-agnostic conic problem (one variable block, an
//! affine objective, and equality, inequality, second-order cone and
//! exponential cone constraints) into the flat arrays an ECOS-style solver
//! takes, and translates the solver's raw result back into a [`Solution`]
//! with normalized status, primal values and per-constraint duals.
//!
//! ## Quick Start
//!
//! ```ignore
//! use conif::prelude::*;
//!
//! let x = variable(3);
//! let xe = AffineExpr::variable(&x);
//!
//! // minimize sum(x) s.t. x >= 1
//! let problem = Problem::minimize(xe.sum())
//!     .subject_to([xe.geq(&AffineExpr::scalar(1.0))?])
//!     .build();
//!
//! let ecos = Ecos::new();
//! let (data, inverse_data) = ecos.apply(&problem)?;
//! let raw = ecos.solve_via_data(&data, false, false, &SolverOptions::new())?;
//! let solution = ecos.invert(&raw, &inverse_data)?;
//!
//! println!("Optimal value: {}", solution.opt_val.unwrap());
//! ```
//!
//! ## Solver convention
//!
//! ```text
//! minimize    c'x
//! subject to  A x = b
//!             G x + s = h,   s in K
//! ```
//!
//! `K` is the product of a nonnegative orthant of size `dims.l`, second-order
//! cones of sizes `dims.q` and `dims.e` exponential cones, stacked in that
//! order. Exponential cone rows are in ECOS order, see [`EXP_CONE_ORDER`].
//!
//! ## Architecture
//!
//! - **Upstream model**: [`Variable`], [`AffineExpr`], [`Constraint`], [`Problem`]
//! - **Forward transform**: constraint grouping and matrix stuffing ([`Ecos::apply`])
//! - **Solve**: any [`ConeProgramBackend`]; [`ClarabelBackend`] is bundled
//! - **Inverse transform**: exit code table and dual recovery ([`Ecos::invert`])

pub mod constraints;
pub mod error;
pub mod expr;
pub mod problem;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use conif::prelude::*;
/// ```
pub mod prelude {
    // Expressions
    pub use crate::expr::{variable, AffineExpr, ConstraintId, Variable, VariableId};

    // Constraints
    pub use crate::constraints::{ConeKind, Constraint, ConstraintExt, ConstraintKind};

    // Problem
    pub use crate::problem::{Objective, Problem, ProblemBuilder};

    // Solver
    pub use crate::solver::{
        ClarabelBackend, ConeProgramBackend, Ecos, OptionValue, Solution, SolveStatus,
        SolverOptions,
    };

    // Errors
    pub use crate::error::{ConifError, Result};
}

// Re-export main types at crate root
pub use constraints::Constraint;
pub use error::{ConifError, Result};
pub use expr::{AffineExpr, Variable};
pub use problem::Problem;
pub use solver::{
    ClarabelBackend, ConeProgramBackend, Ecos, Solution, SolveStatus, EXP_CONE_ORDER,
};
