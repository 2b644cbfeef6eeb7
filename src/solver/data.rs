//! Data exchanged with the solver: the stuffed problem, the bookkeeping kept
//! for inversion, and the raw result.

use nalgebra::DVector;
use nalgebra_sparse::CscMatrix;

use crate::constraints::{ConeKind, Constraint};
use crate::expr::{ConstraintId, VariableId};

/// Cone dimensions in the ECOS convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConeDims {
    /// Number of nonnegative orthant rows.
    pub l: usize,
    /// Second-order cone sizes, in order.
    pub q: Vec<usize>,
    /// Number of exponential cones (each is 3 rows).
    pub e: usize,
}

impl ConeDims {
    /// Total number of rows these cones occupy in `G`.
    pub fn total(&self) -> usize {
        self.l + self.q.iter().sum::<usize>() + 3 * self.e
    }
}

/// Arguments for the solver: `min c'x s.t. Ax = b, Gx + s = h, s in K`.
#[derive(Debug, Clone)]
pub struct SolverData {
    /// Linear objective.
    pub c: DVector<f64>,
    /// Constant objective term, not seen by the solver.
    pub offset: f64,
    /// Equality matrix, one row block per equality constraint.
    pub a: CscMatrix<f64>,
    /// Equality right-hand side.
    pub b: DVector<f64>,
    /// Cone matrix: `[NonPos][SOC][ExpCone]` row blocks.
    pub g: CscMatrix<f64>,
    /// Cone right-hand side.
    pub h: DVector<f64>,
    /// Cone dimensions of `G`.
    pub dims: ConeDims,
}

impl SolverData {
    /// Number of decision variables.
    pub fn num_vars(&self) -> usize {
        self.c.len()
    }
}

/// Position of one constraint inside a stacked block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintLayout {
    /// The constraint the rows belong to.
    pub id: ConstraintId,
    /// Its cone.
    pub cone: ConeKind,
    /// Number of rows it occupies.
    pub size: usize,
}

impl From<&Constraint> for ConstraintLayout {
    fn from(c: &Constraint) -> Self {
        ConstraintLayout {
            id: c.id(),
            cone: c.cone_kind(),
            size: c.size(),
        }
    }
}

/// Everything needed to map a raw result back onto the original problem.
///
/// The constraint layouts are stored in exactly the order their rows were
/// stacked into `A` and `G`.
#[derive(Debug, Clone)]
pub struct InverseData {
    /// The single variable block.
    pub var_id: VariableId,
    /// Its length.
    pub var_size: usize,
    /// Constant objective term.
    pub offset: f64,
    /// Equality constraints, in `A` row order.
    pub eq_constr: Vec<ConstraintLayout>,
    /// NonPos, SOC and ExpCone constraints, in `G` row order.
    pub neq_constr: Vec<ConstraintLayout>,
}

/// Solver timing, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawTiming {
    pub tsetup: f64,
    pub tsolve: f64,
}

/// Solver summary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInfo {
    /// Exit code.
    pub exit_flag: i32,
    /// Primal cost `c'x`.
    pub pcost: f64,
    /// Dual cost.
    pub dcost: f64,
    /// Iterations taken.
    pub iter: u32,
    pub timing: RawTiming,
}

/// What the solver returns, unprocessed.
#[derive(Debug, Clone, Default)]
pub struct RawSolution {
    /// Primal variables.
    pub x: Vec<f64>,
    /// Duals of `Ax = b`.
    pub y: Vec<f64>,
    /// Duals of `Gx + s = h`.
    pub z: Vec<f64>,
    pub info: RawInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_dims_total() {
        let dims = ConeDims {
            l: 3,
            q: vec![4, 5],
            e: 2,
        };
        // 3 + 4 + 5 + 6
        assert_eq!(dims.total(), 18);
    }

    #[test]
    fn test_empty_dims() {
        assert_eq!(ConeDims::default().total(), 0);
    }
}
