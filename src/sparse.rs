//! Sparse matrix utilities.
//!
//! Helper functions for working with nalgebra-sparse matrices.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Create a CSC matrix from triplets (row, col, value).
///
/// Duplicates are summed together. Triplets outside the matrix are dropped.
pub fn csc_from_triplets(
    nrows: usize,
    ncols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
) -> CscMatrix<f64> {
    if rows.is_empty() {
        return CscMatrix::zeros(nrows, ncols);
    }

    let mut coo = CooMatrix::new(nrows, ncols);
    for ((row, col), val) in rows.into_iter().zip(cols).zip(vals) {
        if row < nrows && col < ncols {
            coo.push(row, col, val);
        }
    }

    CscMatrix::from(&coo)
}

/// Convert a dense matrix to CSC format.
pub fn dense_to_csc(dense: &DMatrix<f64>) -> CscMatrix<f64> {
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut vals = Vec::new();

    for j in 0..dense.ncols() {
        for i in 0..dense.nrows() {
            let v = dense[(i, j)];
            if v != 0.0 {
                rows.push(i);
                cols.push(j);
                vals.push(v);
            }
        }
    }

    csc_from_triplets(dense.nrows(), dense.ncols(), rows, cols, vals)
}

/// Convert CSC to dense matrix.
pub fn csc_to_dense(sparse: &CscMatrix<f64>) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(sparse.nrows(), sparse.ncols());
    for (row, col, val) in sparse.triplet_iter() {
        dense[(row, col)] += *val;
    }
    dense
}

/// Stack a sequence of CSC matrices vertically.
///
/// All blocks are placed in `ncols` columns; an empty sequence gives a
/// `0 x ncols` matrix.
pub fn csc_vstack(blocks: &[CscMatrix<f64>], ncols: usize) -> CscMatrix<f64> {
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut vals = Vec::new();

    let mut row_offset = 0;
    for block in blocks {
        for (r, c, v) in block.triplet_iter() {
            rows.push(row_offset + r);
            cols.push(c);
            vals.push(*v);
        }
        row_offset += block.nrows();
    }

    csc_from_triplets(row_offset, ncols, rows, cols, vals)
}

/// Concatenate dense vectors end to end.
pub fn dvec_concat(parts: &[DVector<f64>]) -> DVector<f64> {
    let len = parts.iter().map(|p| p.len()).sum();
    DVector::from_iterator(len, parts.iter().flat_map(|p| p.iter().copied()))
}

/// Add two CSC matrices of equal shape.
pub fn csc_add(a: &CscMatrix<f64>, b: &CscMatrix<f64>) -> CscMatrix<f64> {
    let mut rows = Vec::with_capacity(a.nnz() + b.nnz());
    let mut cols = Vec::with_capacity(a.nnz() + b.nnz());
    let mut vals = Vec::with_capacity(a.nnz() + b.nnz());

    for (r, c, v) in a.triplet_iter().chain(b.triplet_iter()) {
        rows.push(r);
        cols.push(c);
        vals.push(*v);
    }

    csc_from_triplets(a.nrows(), a.ncols(), rows, cols, vals)
}

/// Scale a CSC matrix.
pub fn csc_scale(a: &CscMatrix<f64>, scalar: f64) -> CscMatrix<f64> {
    let mut out = a.clone();
    for v in out.values_mut() {
        *v *= scalar;
    }
    out
}

/// Negate a CSC matrix.
pub fn csc_neg(a: &CscMatrix<f64>) -> CscMatrix<f64> {
    csc_scale(a, -1.0)
}

/// Move the rows of `m` to new positions: row `i` of `m` becomes row
/// `dest[i]` of an `nrows x m.ncols()` result.
///
/// Rows not named in `dest` are zero.
pub fn csc_scatter_rows(m: &CscMatrix<f64>, dest: &[usize], nrows: usize) -> CscMatrix<f64> {
    let mut rows = Vec::with_capacity(m.nnz());
    let mut cols = Vec::with_capacity(m.nnz());
    let mut vals = Vec::with_capacity(m.nnz());

    for (r, c, v) in m.triplet_iter() {
        rows.push(dest[r]);
        cols.push(c);
        vals.push(*v);
    }

    csc_from_triplets(nrows, m.ncols(), rows, cols, vals)
}

/// Select rows of `m` in the given order.
pub fn csc_select_rows(m: &CscMatrix<f64>, rows_to_take: &[usize]) -> CscMatrix<f64> {
    let mut positions: Vec<Vec<usize>> = vec![Vec::new(); m.nrows()];
    for (new_row, &old_row) in rows_to_take.iter().enumerate() {
        positions[old_row].push(new_row);
    }

    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut vals = Vec::new();
    for (r, c, v) in m.triplet_iter() {
        for &new_row in &positions[r] {
            rows.push(new_row);
            cols.push(c);
            vals.push(*v);
        }
    }

    csc_from_triplets(rows_to_take.len(), m.ncols(), rows, cols, vals)
}
