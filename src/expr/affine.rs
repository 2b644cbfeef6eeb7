//! Affine expressions in standard form.
//!
//! An affine expression is `sum_i(A_i * x_i) + b`, one sparse coefficient
//! matrix per variable block and a dense offset vector. Everything is flat:
//! an expression of size `m` is a column of `m` scalar entries.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::CscMatrix;

use super::variable::{Variable, VariableId};
use crate::error::{ConifError, Result};
use crate::sparse::{csc_add, csc_from_triplets, csc_neg, csc_scale, csc_select_rows, dense_to_csc};

/// A flat affine expression: `sum_i(A_i * x_i) + b`.
#[derive(Debug, Clone)]
pub struct AffineExpr {
    /// Coefficient matrices for each variable: var_id -> (size x var_size).
    pub coeffs: HashMap<VariableId, CscMatrix<f64>>,
    /// Constant term (offset), one entry per output row.
    pub constant: DVector<f64>,
}

impl AffineExpr {
    /// The variable itself, with an identity coefficient.
    pub fn variable(var: &Variable) -> Self {
        let mut coeffs = HashMap::new();
        coeffs.insert(var.id, CscMatrix::identity(var.size));
        AffineExpr {
            coeffs,
            constant: DVector::zeros(var.size),
        }
    }

    /// A constant expression.
    pub fn constant(value: DVector<f64>) -> Self {
        AffineExpr {
            coeffs: HashMap::new(),
            constant: value,
        }
    }

    /// A scalar constant.
    pub fn scalar(value: f64) -> Self {
        Self::constant(DVector::from_element(1, value))
    }

    /// `coeff * var + offset` with a sparse coefficient.
    pub fn from_sparse(var: &Variable, coeff: CscMatrix<f64>, offset: DVector<f64>) -> Result<Self> {
        if coeff.ncols() != var.size {
            return Err(ConifError::ShapeMismatch {
                expected: format!("{} coefficient columns", var.size),
                got: format!("{}", coeff.ncols()),
            });
        }
        if coeff.nrows() != offset.len() {
            return Err(ConifError::ShapeMismatch {
                expected: format!("offset of length {}", coeff.nrows()),
                got: format!("{}", offset.len()),
            });
        }
        let mut coeffs = HashMap::new();
        coeffs.insert(var.id, coeff);
        Ok(AffineExpr {
            coeffs,
            constant: offset,
        })
    }

    /// `coeff * var + offset` with a dense coefficient.
    pub fn from_dense(var: &Variable, coeff: &DMatrix<f64>, offset: DVector<f64>) -> Result<Self> {
        Self::from_sparse(var, dense_to_csc(coeff), offset)
    }

    /// Number of scalar entries.
    pub fn size(&self) -> usize {
        self.constant.len()
    }

    /// Check if this is a constant (no variables).
    pub fn is_constant(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Add two expressions. A size-1 operand is broadcast.
    pub fn add(&self, other: &AffineExpr) -> Result<AffineExpr> {
        let (lhs, rhs) = match (self.size(), other.size()) {
            (m, n) if m == n => (self.clone(), other.clone()),
            (1, n) => (self.broadcast(n), other.clone()),
            (m, 1) => (self.clone(), other.broadcast(m)),
            (m, n) => {
                return Err(ConifError::ShapeMismatch {
                    expected: format!("size {}", m),
                    got: format!("size {}", n),
                })
            }
        };

        let mut coeffs = lhs.coeffs;
        for (var_id, coeff) in rhs.coeffs {
            match coeffs.get_mut(&var_id) {
                Some(c) => *c = csc_add(c, &coeff),
                None => {
                    coeffs.insert(var_id, coeff);
                }
            }
        }

        Ok(AffineExpr {
            coeffs,
            constant: lhs.constant + rhs.constant,
        })
    }

    /// `self - other`.
    pub fn sub(&self, other: &AffineExpr) -> Result<AffineExpr> {
        self.add(&other.neg())
    }

    /// Add a scalar to every entry.
    pub fn plus(&self, value: f64) -> AffineExpr {
        let mut out = self.clone();
        out.constant.add_scalar_mut(value);
        out
    }

    /// Negate an expression.
    pub fn neg(&self) -> AffineExpr {
        let coeffs = self.coeffs.iter().map(|(k, v)| (*k, csc_neg(v))).collect();
        AffineExpr {
            coeffs,
            constant: -&self.constant,
        }
    }

    /// Scale by a scalar.
    pub fn scale(&self, scalar: f64) -> AffineExpr {
        let coeffs = self
            .coeffs
            .iter()
            .map(|(k, v)| (*k, csc_scale(v, scalar)))
            .collect();
        AffineExpr {
            coeffs,
            constant: &self.constant * scalar,
        }
    }

    /// Pick entries by index, in order. Indices may repeat.
    pub fn select(&self, indices: &[usize]) -> Result<AffineExpr> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.size()) {
            return Err(ConifError::ShapeMismatch {
                expected: format!("index below {}", self.size()),
                got: format!("{}", bad),
            });
        }
        let coeffs = self
            .coeffs
            .iter()
            .map(|(k, v)| (*k, csc_select_rows(v, indices)))
            .collect();
        let constant = DVector::from_iterator(indices.len(), indices.iter().map(|&i| self.constant[i]));
        Ok(AffineExpr { coeffs, constant })
    }

    /// A single entry.
    pub fn index(&self, i: usize) -> Result<AffineExpr> {
        self.select(&[i])
    }

    /// Sum of all entries, as a scalar expression.
    pub fn sum(&self) -> AffineExpr {
        let coeffs = self
            .coeffs
            .iter()
            .map(|(k, v)| {
                let mut cols = Vec::with_capacity(v.nnz());
                let mut vals = Vec::with_capacity(v.nnz());
                for (_row, col, val) in v.triplet_iter() {
                    cols.push(col);
                    vals.push(*val);
                }
                let rows = vec![0; cols.len()];
                (*k, csc_from_triplets(1, v.ncols(), rows, cols, vals))
            })
            .collect();
        AffineExpr {
            coeffs,
            constant: DVector::from_element(1, self.constant.sum()),
        }
    }

    /// Get all variable IDs in this expression, with the block size each
    /// coefficient implies.
    pub fn variables(&self) -> Vec<(VariableId, usize)> {
        let mut vars: Vec<_> = self.coeffs.iter().map(|(k, v)| (*k, v.ncols())).collect();
        vars.sort_by_key(|(id, _)| id.raw());
        vars
    }

    /// Coefficient extraction: the pair `(M, o)` such that this expression
    /// equals `M * x + o` for the single variable block `x`.
    ///
    /// Fails if the expression references any other variable.
    pub fn coeff_offset(&self, var: &Variable) -> Result<(CscMatrix<f64>, DVector<f64>)> {
        if let Some((other, _)) = self.variables().into_iter().find(|(id, _)| *id != var.id) {
            return Err(ConifError::InvalidProblem(format!(
                "expression references {} outside the variable block {}",
                other, var.id
            )));
        }

        let coeff = match self.coeffs.get(&var.id) {
            Some(c) if c.ncols() != var.size => {
                return Err(ConifError::ShapeMismatch {
                    expected: format!("{} coefficient columns", var.size),
                    got: format!("{}", c.ncols()),
                })
            }
            Some(c) => c.clone(),
            None => CscMatrix::zeros(self.size(), var.size),
        };

        Ok((coeff, self.constant.clone()))
    }

    fn broadcast(&self, n: usize) -> AffineExpr {
        let rows = vec![0; n];
        let coeffs = self
            .coeffs
            .iter()
            .map(|(k, v)| (*k, csc_select_rows(v, &rows)))
            .collect();
        AffineExpr {
            coeffs,
            constant: DVector::from_element(n, self.constant[0]),
        }
    }
}

impl From<&Variable> for AffineExpr {
    fn from(var: &Variable) -> Self {
        AffineExpr::variable(var)
    }
}
