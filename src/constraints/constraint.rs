//! Constraint types for conic problems.
//!
//! Every constraint is an affine expression (or a tuple of them) required to
//! lie in a cone:
//! - Zero: `expr == 0`
//! - NonPos: `expr <= 0` elementwise
//! - Soc: `||X_j||_2 <= t_j` for each cone `j`
//! - ExpCone: `y_j * exp(x_j / y_j) <= z_j, y_j > 0` for each cone `j`
//!
//! The modeling layer also produces `NonNeg`, `Psd` and `PowCone3D`
//! constraints; solvers reject the kinds they cannot encode.

use std::fmt;

use crate::error::{ConifError, Result};
use crate::expr::{AffineExpr, ConstraintId, VariableId};

/// Tag naming the cone a constraint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConeKind {
    /// Equality, the zero cone.
    Zero,
    /// Elementwise `<= 0`.
    NonPos,
    /// Elementwise `>= 0`.
    NonNeg,
    /// Second-order (Lorentz) cones.
    Soc,
    /// Exponential cones.
    ExpCone,
    /// Positive semidefinite cone.
    Psd,
    /// Three-dimensional power cones.
    PowCone3D,
}

impl fmt::Display for ConeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConeKind::Zero => "Zero",
            ConeKind::NonPos => "NonPos",
            ConeKind::NonNeg => "NonNeg",
            ConeKind::Soc => "SOC",
            ConeKind::ExpCone => "ExpCone",
            ConeKind::Psd => "PSD",
            ConeKind::PowCone3D => "PowCone3D",
        };
        f.write_str(name)
    }
}

/// The arguments of a constraint, by kind.
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    /// `expr == 0`.
    Zero(AffineExpr),

    /// `expr <= 0`.
    NonPos(AffineExpr),

    /// `expr >= 0`.
    NonNeg(AffineExpr),

    /// `||X_j||_2 <= t_j` for `j` in `0..t.size()`.
    ///
    /// `x` holds the columns of `X` back to back: cone `j` uses entries
    /// `j*n..(j+1)*n` of `x` where `n = x.size() / t.size()`.
    Soc {
        /// Upper bounds, one per cone.
        t: AffineExpr,
        /// Cone bodies, column by column.
        x: AffineExpr,
    },

    /// `(x_j, y_j, z_j)` in the exponential cone for every entry `j`.
    ExpCone {
        x: AffineExpr,
        y: AffineExpr,
        z: AffineExpr,
    },

    /// `expr`, read as a column-major `dim x dim` matrix, is PSD.
    Psd { expr: AffineExpr, dim: usize },

    /// `x_j^alpha * y_j^(1-alpha) >= |z_j|` for every entry `j`.
    PowCone3D {
        x: AffineExpr,
        y: AffineExpr,
        z: AffineExpr,
        alpha: f64,
    },
}

/// A constraint in an optimization problem.
#[derive(Debug, Clone)]
pub struct Constraint {
    id: ConstraintId,
    kind: ConstraintKind,
}

impl Constraint {
    fn with_kind(kind: ConstraintKind) -> Self {
        Constraint {
            id: ConstraintId::new(),
            kind,
        }
    }

    /// `expr == 0`.
    pub fn zero(expr: AffineExpr) -> Self {
        Self::with_kind(ConstraintKind::Zero(expr))
    }

    /// `expr <= 0`.
    pub fn nonpos(expr: AffineExpr) -> Self {
        Self::with_kind(ConstraintKind::NonPos(expr))
    }

    /// `expr >= 0`.
    pub fn nonneg(expr: AffineExpr) -> Self {
        Self::with_kind(ConstraintKind::NonNeg(expr))
    }

    /// Equality constraint: `lhs == rhs`.
    pub fn eq(lhs: &AffineExpr, rhs: &AffineExpr) -> Result<Self> {
        Ok(Self::zero(lhs.sub(rhs)?))
    }

    /// Inequality constraint: `lhs <= rhs`.
    pub fn leq(lhs: &AffineExpr, rhs: &AffineExpr) -> Result<Self> {
        // lhs <= rhs  <=>  lhs - rhs <= 0
        Ok(Self::nonpos(lhs.sub(rhs)?))
    }

    /// Inequality constraint: `lhs >= rhs`.
    pub fn geq(lhs: &AffineExpr, rhs: &AffineExpr) -> Result<Self> {
        // lhs >= rhs  <=>  rhs - lhs <= 0
        Ok(Self::nonpos(rhs.sub(lhs)?))
    }

    /// A single second-order cone: `||x||_2 <= t` with scalar `t`.
    pub fn soc(t: AffineExpr, x: AffineExpr) -> Result<Self> {
        if t.size() != 1 {
            return Err(ConifError::ShapeMismatch {
                expected: "scalar t".into(),
                got: format!("t of size {}", t.size()),
            });
        }
        Self::soc_columns(t, x)
    }

    /// One second-order cone per entry of `t`, with the cone bodies stored
    /// column by column in `x`.
    pub fn soc_columns(t: AffineExpr, x: AffineExpr) -> Result<Self> {
        if t.size() == 0 || x.size() % t.size() != 0 {
            return Err(ConifError::ShapeMismatch {
                expected: format!("x size a multiple of t size {}", t.size()),
                got: format!("{}", x.size()),
            });
        }
        Ok(Self::with_kind(ConstraintKind::Soc { t, x }))
    }

    /// Elementwise exponential cone membership of `(x, y, z)`.
    pub fn exp_cone(x: AffineExpr, y: AffineExpr, z: AffineExpr) -> Result<Self> {
        check_same_size(&x, &y, &z)?;
        Ok(Self::with_kind(ConstraintKind::ExpCone { x, y, z }))
    }

    /// `expr`, a column-major `dim x dim` matrix, is positive semidefinite.
    pub fn psd(expr: AffineExpr, dim: usize) -> Result<Self> {
        if expr.size() != dim * dim {
            return Err(ConifError::ShapeMismatch {
                expected: format!("{} entries", dim * dim),
                got: format!("{}", expr.size()),
            });
        }
        Ok(Self::with_kind(ConstraintKind::Psd { expr, dim }))
    }

    /// Elementwise 3D power cone membership of `(x, y, z)`.
    pub fn pow_cone(x: AffineExpr, y: AffineExpr, z: AffineExpr, alpha: f64) -> Result<Self> {
        check_same_size(&x, &y, &z)?;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConifError::InvalidProblem(format!(
                "power cone alpha must lie in (0, 1), got {}",
                alpha
            )));
        }
        Ok(Self::with_kind(ConstraintKind::PowCone3D { x, y, z, alpha }))
    }

    /// Unique ID of this constraint.
    pub fn id(&self) -> ConstraintId {
        self.id
    }

    /// The constraint's arguments.
    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// The cone this constraint belongs to.
    pub fn cone_kind(&self) -> ConeKind {
        match &self.kind {
            ConstraintKind::Zero(_) => ConeKind::Zero,
            ConstraintKind::NonPos(_) => ConeKind::NonPos,
            ConstraintKind::NonNeg(_) => ConeKind::NonNeg,
            ConstraintKind::Soc { .. } => ConeKind::Soc,
            ConstraintKind::ExpCone { .. } => ConeKind::ExpCone,
            ConstraintKind::Psd { .. } => ConeKind::Psd,
            ConstraintKind::PowCone3D { .. } => ConeKind::PowCone3D,
        }
    }

    /// Total number of scalar entries across all arguments.
    pub fn size(&self) -> usize {
        self.args().iter().map(|a| a.size()).sum()
    }

    /// Number of cones this constraint is made of.
    ///
    /// Elementwise kinds count one cone per entry; a PSD constraint is one cone.
    pub fn num_cones(&self) -> usize {
        match &self.kind {
            ConstraintKind::Zero(e) | ConstraintKind::NonPos(e) | ConstraintKind::NonNeg(e) => {
                e.size()
            }
            ConstraintKind::Soc { t, .. } => t.size(),
            ConstraintKind::ExpCone { x, .. } | ConstraintKind::PowCone3D { x, .. } => x.size(),
            ConstraintKind::Psd { .. } => 1,
        }
    }

    /// Size of each cone, in order.
    pub fn cone_sizes(&self) -> Vec<usize> {
        match &self.kind {
            ConstraintKind::Soc { t, x } => vec![x.size() / t.size() + 1; t.size()],
            ConstraintKind::ExpCone { x, .. } | ConstraintKind::PowCone3D { x, .. } => {
                vec![3; x.size()]
            }
            ConstraintKind::Psd { dim, .. } => vec![dim * dim],
            _ => vec![1; self.num_cones()],
        }
    }

    /// Get all expressions in this constraint.
    pub fn args(&self) -> Vec<&AffineExpr> {
        match &self.kind {
            ConstraintKind::Zero(e) | ConstraintKind::NonPos(e) | ConstraintKind::NonNeg(e) => {
                vec![e]
            }
            ConstraintKind::Soc { t, x } => vec![t, x],
            ConstraintKind::ExpCone { x, y, z } | ConstraintKind::PowCone3D { x, y, z, .. } => {
                vec![x, y, z]
            }
            ConstraintKind::Psd { expr, .. } => vec![expr],
        }
    }

    /// Get all variables in this constraint with their block sizes.
    pub fn variables(&self) -> Vec<(VariableId, usize)> {
        let mut vars: Vec<_> = self.args().iter().flat_map(|e| e.variables()).collect();
        vars.sort_by_key(|(id, _)| id.raw());
        vars.dedup_by_key(|(id, _)| *id);
        vars
    }
}

fn check_same_size(x: &AffineExpr, y: &AffineExpr, z: &AffineExpr) -> Result<()> {
    if x.size() != y.size() || x.size() != z.size() {
        return Err(ConifError::ShapeMismatch {
            expected: format!("three arguments of size {}", x.size()),
            got: format!("sizes ({}, {}, {})", x.size(), y.size(), z.size()),
        });
    }
    Ok(())
}

/// Extension trait for creating constraints from expressions.
pub trait ConstraintExt {
    /// Create equality constraint: self == rhs.
    fn equals(&self, rhs: &AffineExpr) -> Result<Constraint>;

    /// Create inequality constraint: self <= rhs.
    fn leq(&self, rhs: &AffineExpr) -> Result<Constraint>;

    /// Create inequality constraint: self >= rhs.
    fn geq(&self, rhs: &AffineExpr) -> Result<Constraint>;
}

impl ConstraintExt for AffineExpr {
    fn equals(&self, rhs: &AffineExpr) -> Result<Constraint> {
        Constraint::eq(self, rhs)
    }

    fn leq(&self, rhs: &AffineExpr) -> Result<Constraint> {
        Constraint::leq(self, rhs)
    }

    fn geq(&self, rhs: &AffineExpr) -> Result<Constraint> {
        Constraint::geq(self, rhs)
    }
}
