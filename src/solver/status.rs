//! Solver exit codes and their translation to solution statuses.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::error::{ConifError, Result};

/// Problem solved to optimality.
pub const ECOS_OPTIMAL: i32 = 0;
/// Found certificate of primal infeasibility.
pub const ECOS_PINF: i32 = 1;
/// Found certificate of dual infeasibility.
pub const ECOS_DINF: i32 = 2;
/// Added to the three codes above when the result is inaccurate.
pub const ECOS_INACC_OFFSET: i32 = 10;
/// Maximum number of iterations reached.
pub const ECOS_MAXIT: i32 = -1;
/// Search direction unreliable.
pub const ECOS_NUMERICS: i32 = -2;
/// s or z got outside the cone.
pub const ECOS_OUTCONE: i32 = -3;
/// Solver interrupted by a signal.
pub const ECOS_SIGINT: i32 = -4;
/// Unknown problem in solver.
pub const ECOS_FATAL: i32 = -7;

/// Status of a solve, normalized across solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Optimal to reduced accuracy.
    OptimalInaccurate,
    /// Infeasible to reduced accuracy.
    InfeasibleInaccurate,
    /// Unbounded to reduced accuracy.
    UnboundedInaccurate,
    /// The solver stopped without a usable answer.
    SolverError,
}

impl SolveStatus {
    /// Whether a primal/dual solution accompanies this status.
    pub fn is_solution_present(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::OptimalInaccurate)
    }

    /// Whether this is one of the reduced-accuracy statuses.
    pub fn is_inaccurate(&self) -> bool {
        matches!(
            self,
            SolveStatus::OptimalInaccurate
                | SolveStatus::InfeasibleInaccurate
                | SolveStatus::UnboundedInaccurate
        )
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::OptimalInaccurate => "optimal_inaccurate",
            SolveStatus::InfeasibleInaccurate => "infeasible_inaccurate",
            SolveStatus::UnboundedInaccurate => "unbounded_inaccurate",
            SolveStatus::SolverError => "solver_error",
        };
        f.write_str(name)
    }
}

lazy_static! {
    /// Map of ECOS exit codes to statuses.
    pub static ref STATUS_MAP: HashMap<i32, SolveStatus> = {
        let mut m = HashMap::new();
        m.insert(ECOS_OPTIMAL, SolveStatus::Optimal);
        m.insert(ECOS_PINF, SolveStatus::Infeasible);
        m.insert(ECOS_DINF, SolveStatus::Unbounded);
        m.insert(10, SolveStatus::OptimalInaccurate);
        m.insert(11, SolveStatus::InfeasibleInaccurate);
        m.insert(12, SolveStatus::UnboundedInaccurate);
        m.insert(ECOS_MAXIT, SolveStatus::SolverError);
        m.insert(ECOS_NUMERICS, SolveStatus::SolverError);
        m.insert(ECOS_OUTCONE, SolveStatus::SolverError);
        m.insert(ECOS_SIGINT, SolveStatus::SolverError);
        m.insert(ECOS_FATAL, SolveStatus::SolverError);
        m
    };
}

/// Translate an exit code. Codes outside the table are an error, never a
/// default status.
pub fn status_from_exit_code(code: i32) -> Result<SolveStatus> {
    STATUS_MAP
        .get(&code)
        .copied()
        .ok_or(ConifError::UnknownExitCode(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_translates() {
        for (&code, &status) in STATUS_MAP.iter() {
            assert_eq!(status_from_exit_code(code).unwrap(), status);
        }
        assert_eq!(STATUS_MAP.len(), 11);
    }

    #[test]
    fn test_unknown_codes_fail() {
        for code in [3, 9, 13, -5, -6, -8, 100, i32::MIN] {
            assert!(matches!(
                status_from_exit_code(code),
                Err(ConifError::UnknownExitCode(c)) if c == code
            ));
        }
    }

    #[test]
    fn test_inaccurate_codes_are_offset_by_ten() {
        // The table is written out literally; this pins the solver's
        // convention so drift shows up here.
        let pairs = [
            (SolveStatus::Optimal, SolveStatus::OptimalInaccurate),
            (SolveStatus::Infeasible, SolveStatus::InfeasibleInaccurate),
            (SolveStatus::Unbounded, SolveStatus::UnboundedInaccurate),
        ];
        for (code, (accurate, inaccurate)) in [ECOS_OPTIMAL, ECOS_PINF, ECOS_DINF].into_iter().zip(pairs) {
            assert_eq!(STATUS_MAP[&code], accurate);
            assert_eq!(STATUS_MAP[&(code + ECOS_INACC_OFFSET)], inaccurate);
            assert!(STATUS_MAP[&(code + ECOS_INACC_OFFSET)].is_inaccurate());
        }
    }

    #[test]
    fn test_solution_present() {
        assert!(SolveStatus::Optimal.is_solution_present());
        assert!(SolveStatus::OptimalInaccurate.is_solution_present());
        assert!(!SolveStatus::Infeasible.is_solution_present());
        assert!(!SolveStatus::UnboundedInaccurate.is_solution_present());
        assert!(!SolveStatus::SolverError.is_solution_present());
    }

    #[test]
    fn test_interrupt_is_solver_error() {
        assert_eq!(status_from_exit_code(ECOS_SIGINT).unwrap(), SolveStatus::SolverError);
    }
}
