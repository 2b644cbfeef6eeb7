//! Problem definition.
//!
//! The `Problem` struct represents a conic problem with:
//! - An objective (minimize or maximize an affine expression)
//! - An ordered list of constraints
//!
//! Use the builder pattern to construct problems:
//! ```ignore
//! let problem = Problem::minimize(objective)
//!     .subject_to([constraint1, constraint2])
//!     .build();
//! ```

use crate::constraints::{ConeKind, Constraint};
use crate::expr::{AffineExpr, VariableId};

/// Objective type for optimization problems.
#[derive(Debug, Clone)]
pub enum Objective {
    /// Minimize the expression.
    Minimize(AffineExpr),
    /// Maximize the expression.
    Maximize(AffineExpr),
}

impl Objective {
    /// Get the expression being optimized.
    pub fn expr(&self) -> &AffineExpr {
        match self {
            Objective::Minimize(e) | Objective::Maximize(e) => e,
        }
    }

    /// Check if this is a minimization.
    pub fn is_minimize(&self) -> bool {
        matches!(self, Objective::Minimize(_))
    }
}

/// An optimization problem.
#[derive(Debug, Clone)]
pub struct Problem {
    /// The objective to optimize.
    pub objective: Objective,
    /// The constraints, in the order they were added.
    pub constraints: Vec<Constraint>,
}

impl Problem {
    /// Create a minimization problem.
    pub fn minimize(expr: AffineExpr) -> ProblemBuilder {
        ProblemBuilder {
            objective: Objective::Minimize(expr),
            constraints: Vec::new(),
        }
    }

    /// Create a maximization problem.
    pub fn maximize(expr: AffineExpr) -> ProblemBuilder {
        ProblemBuilder {
            objective: Objective::Maximize(expr),
            constraints: Vec::new(),
        }
    }

    /// Get all variable blocks in this problem with their sizes, ordered by ID.
    pub fn variables(&self) -> Vec<(VariableId, usize)> {
        let mut vars = self.objective.expr().variables();
        for c in &self.constraints {
            vars.extend(c.variables());
        }
        vars.sort_by_key(|(id, _)| id.raw());
        vars.dedup_by_key(|(id, _)| *id);
        vars
    }

    /// The distinct constraint kinds present, in first-appearance order.
    pub fn constraint_kinds(&self) -> Vec<ConeKind> {
        let mut kinds = Vec::new();
        for c in &self.constraints {
            let kind = c.cone_kind();
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }
}

/// Builder for constructing problems.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    objective: Objective,
    constraints: Vec<Constraint>,
}

impl ProblemBuilder {
    /// Add constraints to the problem.
    pub fn subject_to(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Add a single constraint.
    pub fn constraint(mut self, c: Constraint) -> Self {
        self.constraints.push(c);
        self
    }

    /// Build the problem.
    pub fn build(self) -> Problem {
        Problem {
            objective: self.objective,
            constraints: self.constraints,
        }
    }
}
