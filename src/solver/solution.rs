//! Solutions handed back to callers.

use std::collections::HashMap;

use nalgebra::DVector;

use super::status::SolveStatus;
use crate::constraints::Constraint;
use crate::expr::{ConstraintId, Variable, VariableId};

/// Solve statistics, reported whatever the status.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveAttributes {
    /// Solve time in seconds.
    pub solve_time: f64,
    /// Setup time in seconds.
    pub setup_time: f64,
    /// Number of iterations.
    pub num_iters: u32,
}

/// Solution of a problem.
///
/// `opt_val`, `primal_vars` and `dual_vars` are set only when the status
/// carries a solution.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status.
    pub status: SolveStatus,
    /// Optimal value, including the objective's constant term.
    pub opt_val: Option<f64>,
    /// Primal values by variable.
    pub primal_vars: Option<HashMap<VariableId, DVector<f64>>>,
    /// Dual values by constraint.
    pub dual_vars: Option<HashMap<ConstraintId, DVector<f64>>>,
    pub attr: SolveAttributes,
}

impl Solution {
    /// A populated solution.
    pub fn new(
        status: SolveStatus,
        opt_val: f64,
        primal_vars: HashMap<VariableId, DVector<f64>>,
        dual_vars: HashMap<ConstraintId, DVector<f64>>,
        attr: SolveAttributes,
    ) -> Self {
        Solution {
            status,
            opt_val: Some(opt_val),
            primal_vars: Some(primal_vars),
            dual_vars: Some(dual_vars),
            attr,
        }
    }

    /// The canonical solution for a status without a solution.
    pub fn failure(status: SolveStatus, attr: SolveAttributes) -> Self {
        Solution {
            status,
            opt_val: None,
            primal_vars: None,
            dual_vars: None,
            attr,
        }
    }

    /// Check if primal and dual values are available.
    pub fn has_solution(&self) -> bool {
        self.primal_vars.is_some()
    }

    /// Get the value of a variable.
    pub fn value(&self, var: &Variable) -> Option<&DVector<f64>> {
        self.value_by_id(var.id)
    }

    /// Get the value of a variable by ID.
    pub fn value_by_id(&self, id: VariableId) -> Option<&DVector<f64>> {
        self.primal_vars.as_ref().and_then(|p| p.get(&id))
    }

    /// Get the dual value of a constraint.
    pub fn dual(&self, constraint: &Constraint) -> Option<&DVector<f64>> {
        self.dual_by_id(constraint.id())
    }

    /// Get the dual value of a constraint by ID.
    pub fn dual_by_id(&self, id: ConstraintId) -> Option<&DVector<f64>> {
        self.dual_vars.as_ref().and_then(|d| d.get(&id))
    }
}
