//! Clarabel backend.
//!
//! Runs problems in the `(c, G, h, dims, A, b)` convention on the Clarabel
//! interior point solver and reports the result as ECOS would: ECOS exit
//! codes, duals split into `y` and `z`, exponential cone rows in ECOS order.

use std::time::Instant;

use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{DefaultSettings, DefaultSolver, IPSolver, SolverStatus, SupportedConeT};
use nalgebra_sparse::CscMatrix;

use super::backend::ConeProgramBackend;
use super::data::{ConeDims, RawInfo, RawSolution, RawTiming, SolverData};
use super::ecos::EXP_CONE_ORDER;
use super::options::{OptionValue, SolverOptions};
use super::status::{
    ECOS_DINF, ECOS_FATAL, ECOS_INACC_OFFSET, ECOS_MAXIT, ECOS_NUMERICS, ECOS_OPTIMAL, ECOS_PINF,
};
use crate::error::{ConifError, Result};
use crate::sparse::{csc_select_rows, csc_vstack, dvec_concat};

/// Solves with Clarabel. Clarabel has no warm start; the flag is ignored.
///
/// Recognized options: `max_iters`, `abstol`, `reltol`, `feastol`,
/// `abstol_inacc`, `reltol_inacc`, `feastol_inacc`, `time_limit`. Anything
/// else is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClarabelBackend;

impl ConeProgramBackend for ClarabelBackend {
    fn solve(
        &self,
        data: &SolverData,
        warm_start: bool,
        verbose: bool,
        options: &SolverOptions,
    ) -> Result<RawSolution> {
        check_data(data)?;

        let mut settings = DefaultSettings::<f64>::default();
        settings.verbose = verbose;
        apply_options(&mut settings, options)?;
        if warm_start {
            log::warn!("Clarabel does not support warm starts; solving from scratch");
        }

        // Clarabel form: Ax + s = b, s in K, with the equalities as a zero cone
        // on top. Row r of the stacked system is ECOS row rows[r].
        let n = data.num_vars();
        let n_eq = data.a.nrows();
        let rows = stacked_row_order(n_eq, &data.dims);

        let stacked = csc_vstack(&[data.a.clone(), data.g.clone()], n);
        let a = to_clarabel_csc(&csc_select_rows(&stacked, &rows));
        let rhs = dvec_concat(&[data.b.clone(), data.h.clone()]);
        let b: Vec<f64> = rows.iter().map(|&r| rhs[r]).collect();
        let p = to_clarabel_csc(&CscMatrix::zeros(n, n));
        let q: Vec<f64> = data.c.iter().copied().collect();
        let cones = to_clarabel_cones(n_eq, &data.dims);

        log::debug!(
            "clarabel: n={} m={} cones={} max_iter={}",
            n,
            b.len(),
            cones.len(),
            settings.max_iter
        );

        let setup_start = Instant::now();
        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings);
        let tsetup = setup_start.elapsed().as_secs_f64();
        solver.solve();

        let solution = &solver.solution;
        if solution.z.len() != rows.len() || solution.x.len() != n {
            return Err(ConifError::SolverInternalError(format!(
                "clarabel returned {} primal and {} dual entries for a {} x {} problem",
                solution.x.len(),
                solution.z.len(),
                rows.len(),
                n
            )));
        }

        let mut y = vec![0.0; rows.len()];
        for (r, &ecos_row) in rows.iter().enumerate() {
            y[ecos_row] = solution.z[r];
        }
        let z = y.split_off(n_eq);

        Ok(RawSolution {
            x: solution.x.clone(),
            y,
            z,
            info: RawInfo {
                exit_flag: exit_flag(solution.status),
                pcost: solution.obj_val,
                dcost: solution.obj_val_dual,
                iter: solution.iterations,
                timing: RawTiming {
                    tsetup,
                    tsolve: solution.solve_time,
                },
            },
        })
    }
}

/// ECOS exit code for a Clarabel status.
fn exit_flag(status: SolverStatus) -> i32 {
    match status {
        SolverStatus::Solved => ECOS_OPTIMAL,
        SolverStatus::PrimalInfeasible => ECOS_PINF,
        SolverStatus::DualInfeasible => ECOS_DINF,
        SolverStatus::AlmostSolved => ECOS_OPTIMAL + ECOS_INACC_OFFSET,
        SolverStatus::AlmostPrimalInfeasible => ECOS_PINF + ECOS_INACC_OFFSET,
        SolverStatus::AlmostDualInfeasible => ECOS_DINF + ECOS_INACC_OFFSET,
        SolverStatus::MaxIterations | SolverStatus::MaxTime => ECOS_MAXIT,
        SolverStatus::NumericalError | SolverStatus::InsufficientProgress => ECOS_NUMERICS,
        SolverStatus::Unsolved => ECOS_FATAL,
    }
}

/// Row permutation from ECOS order to Clarabel order.
///
/// Identity except on the exponential cones, whose rows ECOS keeps as
/// `(x, z, y)` and Clarabel as `(x, y, z)`.
fn stacked_row_order(n_eq: usize, dims: &ConeDims) -> Vec<usize> {
    let total = n_eq + dims.total();
    let mut rows: Vec<usize> = (0..total).collect();
    let exp_start = n_eq + dims.l + dims.q.iter().sum::<usize>();
    for j in 0..dims.e {
        let base = exp_start + 3 * j;
        for (i, &slot) in EXP_CONE_ORDER.iter().enumerate() {
            rows[base + i] = base + slot;
        }
    }
    rows
}

/// Convert cone dimensions to Clarabel cones.
fn to_clarabel_cones(n_eq: usize, dims: &ConeDims) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::new();

    if n_eq > 0 {
        cones.push(SupportedConeT::ZeroConeT(n_eq));
    }

    if dims.l > 0 {
        cones.push(SupportedConeT::NonnegativeConeT(dims.l));
    }

    for &soc_dim in &dims.q {
        // a one-dimensional second-order cone is just t >= 0
        match soc_dim {
            0 => {}
            1 => cones.push(SupportedConeT::NonnegativeConeT(1)),
            _ => cones.push(SupportedConeT::SecondOrderConeT(soc_dim)),
        }
    }

    for _ in 0..dims.e {
        cones.push(SupportedConeT::ExponentialConeT());
    }

    cones
}

/// Convert nalgebra CSC to Clarabel CSC.
fn to_clarabel_csc(m: &CscMatrix<f64>) -> ClarabelCsc<f64> {
    ClarabelCsc::new(
        m.nrows(),
        m.ncols(),
        m.col_offsets().to_vec(),
        m.row_indices().to_vec(),
        m.values().to_vec(),
    )
}

fn apply_options(settings: &mut DefaultSettings<f64>, options: &SolverOptions) -> Result<()> {
    for (name, value) in options.iter() {
        match name {
            "max_iters" => settings.max_iter = int_option(name, value)?,
            "abstol" => settings.tol_gap_abs = float_option(name, value)?,
            "reltol" => settings.tol_gap_rel = float_option(name, value)?,
            "feastol" => settings.tol_feas = float_option(name, value)?,
            "abstol_inacc" => settings.reduced_tol_gap_abs = float_option(name, value)?,
            "reltol_inacc" => settings.reduced_tol_gap_rel = float_option(name, value)?,
            "feastol_inacc" => settings.reduced_tol_feas = float_option(name, value)?,
            "time_limit" => settings.time_limit = float_option(name, value)?,
            _ => {
                return Err(ConifError::SolverInternalError(format!(
                    "unrecognized option '{}'",
                    name
                )))
            }
        }
        log::debug!("clarabel option {} = {}", name, value);
    }
    Ok(())
}

fn int_option(name: &str, value: &OptionValue) -> Result<u32> {
    value.as_u32().ok_or_else(|| {
        ConifError::SolverInternalError(format!(
            "option '{}' expects a non-negative integer, got {}",
            name, value
        ))
    })
}

fn float_option(name: &str, value: &OptionValue) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        ConifError::SolverInternalError(format!(
            "option '{}' expects a number, got {}",
            name, value
        ))
    })
}

/// Reject data Clarabel would panic on.
fn check_data(data: &SolverData) -> Result<()> {
    let n = data.num_vars();
    let consistent = data.a.ncols() == n
        && data.g.ncols() == n
        && data.b.len() == data.a.nrows()
        && data.h.len() == data.g.nrows()
        && data.g.nrows() == data.dims.total();
    if !consistent {
        return Err(ConifError::SolverInternalError(format!(
            "inconsistent problem data: c {}, A {}x{}, b {}, G {}x{}, h {}, cone rows {}",
            n,
            data.a.nrows(),
            data.a.ncols(),
            data.b.len(),
            data.g.nrows(),
            data.g.ncols(),
            data.h.len(),
            data.dims.total()
        )));
    }

    let finite = data
        .c
        .iter()
        .chain(data.b.iter())
        .chain(data.h.iter())
        .chain(data.a.values())
        .chain(data.g.values())
        .all(|v| v.is_finite());
    if !finite {
        return Err(ConifError::SolverInternalError(
            "problem data contains NaN or infinite entries".into(),
        ));
    }

    Ok(())
}
