//! The numeric solve step, behind a trait.

use super::data::{RawSolution, SolverData};
use super::options::SolverOptions;
use crate::error::Result;

/// A solver that accepts problems in the `(c, G, h, dims, A, b)` convention
/// and reports ECOS exit codes.
///
/// Implementations own option handling: the adapter passes `options`
/// through without looking at them. A fault inside the solver is reported
/// as [`ConifError::SolverInternalError`](crate::ConifError::SolverInternalError).
pub trait ConeProgramBackend {
    /// Solve the stuffed problem.
    fn solve(
        &self,
        data: &SolverData,
        warm_start: bool,
        verbose: bool,
        options: &SolverOptions,
    ) -> Result<RawSolution>;
}

impl<B: ConeProgramBackend + ?Sized> ConeProgramBackend for &B {
    fn solve(
        &self,
        data: &SolverData,
        warm_start: bool,
        verbose: bool,
        options: &SolverOptions,
    ) -> Result<RawSolution> {
        (**self).solve(data, warm_start, verbose, options)
    }
}
