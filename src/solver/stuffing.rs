//! Matrix stuffing: converts constraints to solver rows and solver duals back
//! to constraints.
//!
//! Each constraint becomes a row block `(M, h)`. Blocks are stacked in the
//! order given; `get_dual_values` walks the same order to cut the dual vector
//! back into per-constraint pieces.

use std::collections::HashMap;

use nalgebra::DVector;
use nalgebra_sparse::CscMatrix;

use super::data::ConstraintLayout;
use crate::constraints::{ConeKind, Constraint, ConstraintKind};
use crate::error::{ConifError, Result};
use crate::expr::{AffineExpr, ConstraintId, Variable};
use crate::sparse::{csc_add, csc_neg, csc_scatter_rows, csc_vstack, dvec_concat};

/// Row block for a single constraint in the `Ax = b` / `Gx + s = h` convention.
///
/// For an expression `M x + o`:
/// - Zero and NonPos give `(M, -o)`, so `Mx = -o` or `Mx + s = -o`.
/// - SOC and ExpCone give `(-M, o)`, so the slack `s = Mx + o` is the cone
///   argument itself.
///
/// SOC rows are laid out cone by cone as `[t_j, X_j]`. ExpCone rows are laid
/// out cone by cone, argument `i` of cone `j` landing on row
/// `3j + exp_cone_order[i]`.
pub fn format_constr(
    constr: &Constraint,
    var: &Variable,
    exp_cone_order: &[usize; 3],
) -> Result<(CscMatrix<f64>, DVector<f64>)> {
    match constr.kind() {
        ConstraintKind::Zero(expr) | ConstraintKind::NonPos(expr) => {
            let (coeff, offset) = expr.coeff_offset(var)?;
            Ok((coeff, -offset))
        }
        ConstraintKind::Soc { t, x } => {
            let cones = t.size();
            let body = x.size() / cones;
            let t_rows: Vec<usize> = (0..cones).map(|j| j * (body + 1)).collect();
            let x_rows: Vec<usize> = (0..cones)
                .flat_map(|j| (0..body).map(move |r| j * (body + 1) + 1 + r))
                .collect();
            let (coeff, offset) = interleave(&[(t, t_rows), (x, x_rows)], constr.size(), var)?;
            Ok((csc_neg(&coeff), offset))
        }
        ConstraintKind::ExpCone { x, y, z } => {
            let cones = x.size();
            let rows_for = |i: usize| -> Vec<usize> {
                (0..cones).map(|j| 3 * j + exp_cone_order[i]).collect()
            };
            let (coeff, offset) = interleave(
                &[(x, rows_for(0)), (y, rows_for(1)), (z, rows_for(2))],
                constr.size(),
                var,
            )?;
            Ok((csc_neg(&coeff), offset))
        }
        ConstraintKind::NonNeg(_) | ConstraintKind::Psd { .. } | ConstraintKind::PowCone3D { .. } => {
            Err(ConifError::UnsupportedConstraint(format!(
                "{} constraint {}",
                constr.cone_kind(),
                constr.id()
            )))
        }
    }
}

/// Stack the row blocks of `constraints`, in order.
///
/// An empty list gives a `0 x var.size` matrix and an empty vector.
pub fn group_coeff_offset(
    constraints: &[&Constraint],
    var: &Variable,
    exp_cone_order: &[usize; 3],
) -> Result<(CscMatrix<f64>, DVector<f64>)> {
    let mut matrices = Vec::with_capacity(constraints.len());
    let mut offsets = Vec::with_capacity(constraints.len());

    for constr in constraints {
        let (coeff, offset) = format_constr(constr, var, exp_cone_order)?;
        matrices.push(coeff);
        offsets.push(offset);
    }

    Ok((csc_vstack(&matrices, var.size), dvec_concat(&offsets)))
}

/// Cut a flat dual vector into per-constraint pieces following `layouts`.
///
/// ExpCone pieces are returned as `(x, y, z)` triples, cone by cone, undoing
/// `exp_cone_order`.
pub fn get_dual_values(
    result: &[f64],
    layouts: &[ConstraintLayout],
    exp_cone_order: &[usize; 3],
    what: &'static str,
) -> Result<HashMap<ConstraintId, DVector<f64>>> {
    let expected: usize = layouts.iter().map(|l| l.size).sum();
    if result.len() != expected {
        return Err(ConifError::DimensionMismatch {
            what,
            expected,
            got: result.len(),
        });
    }

    let mut dual_vars = HashMap::with_capacity(layouts.len());
    let mut offset = 0;
    for layout in layouts {
        let piece = &result[offset..offset + layout.size];
        let values = match layout.cone {
            ConeKind::ExpCone => unpermute_exp_cone_rows(piece, exp_cone_order),
            _ => piece.to_vec(),
        };
        dual_vars.insert(layout.id, DVector::from_vec(values));
        offset += layout.size;
    }

    Ok(dual_vars)
}

/// Reorder interleaved `(x, y, z)` triples into solver order:
/// entry `i` of each triple moves to position `exp_cone_order[i]`.
pub fn permute_exp_cone_rows(values: &[f64], exp_cone_order: &[usize; 3]) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    for (j, cone) in values.chunks_exact(3).enumerate() {
        for (i, &v) in cone.iter().enumerate() {
            out[3 * j + exp_cone_order[i]] = v;
        }
    }
    out
}

/// Inverse of [`permute_exp_cone_rows`].
pub fn unpermute_exp_cone_rows(values: &[f64], exp_cone_order: &[usize; 3]) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    for (j, cone) in values.chunks_exact(3).enumerate() {
        for (i, slot) in out[3 * j..3 * j + 3].iter_mut().enumerate() {
            *slot = cone[exp_cone_order[i]];
        }
    }
    out
}

/// Place the rows of several expressions into one `nrows` block; row `r` of
/// an expression goes to the position its row list names.
fn interleave(
    parts: &[(&AffineExpr, Vec<usize>)],
    nrows: usize,
    var: &Variable,
) -> Result<(CscMatrix<f64>, DVector<f64>)> {
    let mut coeff = CscMatrix::zeros(nrows, var.size);
    let mut offset = DVector::zeros(nrows);

    for (expr, rows) in parts {
        let (m, o) = expr.coeff_offset(var)?;
        coeff = csc_add(&coeff, &csc_scatter_rows(&m, rows, nrows));
        for (r, v) in o.iter().enumerate() {
            offset[rows[r]] = *v;
        }
    }

    Ok((coeff, offset))
}
