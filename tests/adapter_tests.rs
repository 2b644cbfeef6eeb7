//! Forward/inverse transform tests against a scripted backend.
//!
//! The backend never solves anything; it records what it was handed and
//! answers with a result built from the stuffed data, so every property of
//! the translation can be checked exactly.

use std::cell::{Cell, RefCell};

use conif::prelude::*;
use conif::solver::stuffing::{permute_exp_cone_rows, unpermute_exp_cone_rows};
use conif::solver::{RawInfo, RawSolution, SolverData, STATUS_MAP};
use conif::sparse::csc_to_dense;
use conif::EXP_CONE_ORDER;
use nalgebra::{DMatrix, DVector};

/// Backend that answers with `respond(data)` and counts calls.
struct Scripted<F: Fn(&SolverData) -> conif::Result<RawSolution>> {
    respond: F,
    calls: Cell<usize>,
    last_options: RefCell<Option<SolverOptions>>,
}

impl<F: Fn(&SolverData) -> conif::Result<RawSolution>> Scripted<F> {
    fn new(respond: F) -> Self {
        Scripted {
            respond,
            calls: Cell::new(0),
            last_options: RefCell::new(None),
        }
    }
}

impl<F: Fn(&SolverData) -> conif::Result<RawSolution>> ConeProgramBackend for Scripted<F> {
    fn solve(
        &self,
        data: &SolverData,
        _warm_start: bool,
        _verbose: bool,
        options: &SolverOptions,
    ) -> conif::Result<RawSolution> {
        self.calls.set(self.calls.get() + 1);
        *self.last_options.borrow_mut() = Some(options.clone());
        (self.respond)(data)
    }
}

/// An optimal result whose duals are 0, 1, 2, ... in row order.
fn counting_result(data: &SolverData) -> conif::Result<RawSolution> {
    let eq_rows = data.a.nrows();
    Ok(RawSolution {
        x: vec![0.0; data.num_vars()],
        y: (0..eq_rows).map(|i| i as f64).collect(),
        z: (0..data.g.nrows()).map(|i| (eq_rows + i) as f64).collect(),
        info: RawInfo {
            exit_flag: 0,
            ..Default::default()
        },
    })
}

fn raw_with_code(code: i32, n: usize) -> RawSolution {
    RawSolution {
        x: vec![0.0; n],
        info: RawInfo {
            exit_flag: code,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A problem touching every supported kind, deliberately out of group order.
struct Mixed {
    problem: Problem,
    eq_small: Constraint,
    eq_big: Constraint,
    nonpos: Constraint,
    soc: Constraint,
    exp: Constraint,
}

fn mixed_problem() -> Mixed {
    let x = variable(4);
    let xe = AffineExpr::variable(&x);

    let exp = Constraint::exp_cone(
        xe.select(&[0, 1]).unwrap(),
        xe.select(&[2, 3]).unwrap().plus(1.0),
        xe.select(&[1, 0]).unwrap().plus(2.0),
    )
    .unwrap();
    let eq_big = xe.select(&[0, 1]).unwrap().equals(&AffineExpr::scalar(1.0)).unwrap();
    let soc = Constraint::soc_columns(
        xe.select(&[0, 1]).unwrap(),
        xe.select(&[2, 3, 3, 2]).unwrap(),
    )
    .unwrap();
    let nonpos = xe.leq(&AffineExpr::scalar(4.0)).unwrap();
    let eq_small = xe.index(3).unwrap().equals(&AffineExpr::scalar(0.5)).unwrap();

    let problem = Problem::minimize(xe.sum())
        .subject_to([
            exp.clone(),
            eq_big.clone(),
            soc.clone(),
            nonpos.clone(),
            eq_small.clone(),
        ])
        .build();

    Mixed {
        problem,
        eq_small,
        eq_big,
        nonpos,
        soc,
        exp,
    }
}

#[test]
fn test_row_counts() {
    let m = mixed_problem();
    let (data, inv) = Ecos::new().apply(&m.problem).unwrap();

    let eq_elements = m.eq_big.size() + m.eq_small.size();
    assert_eq!(data.a.nrows(), eq_elements);
    assert_eq!(data.b.len(), eq_elements);

    assert_eq!(data.dims.l, 4);
    assert_eq!(data.dims.q, vec![3, 3]);
    assert_eq!(data.dims.e, 2);
    assert_eq!(
        data.g.nrows(),
        data.dims.l + data.dims.q.iter().sum::<usize>() + 3 * data.dims.e
    );
    assert_eq!(data.h.len(), data.g.nrows());
    assert_eq!(data.a.ncols(), 4);
    assert_eq!(data.g.ncols(), 4);

    assert_eq!(inv.eq_constr.len(), 2);
    assert_eq!(inv.neq_constr.len(), 3);
}

#[test]
fn test_layout_order_is_recorded() {
    let m = mixed_problem();
    let (_, inv) = Ecos::new().apply(&m.problem).unwrap();

    let eq: Vec<_> = inv.eq_constr.iter().map(|l| l.id).collect();
    assert_eq!(eq, vec![m.eq_big.id(), m.eq_small.id()]);

    let neq: Vec<_> = inv.neq_constr.iter().map(|l| (l.id, l.cone)).collect();
    assert_eq!(
        neq,
        vec![
            (m.nonpos.id(), ConeKind::NonPos),
            (m.soc.id(), ConeKind::Soc),
            (m.exp.id(), ConeKind::ExpCone),
        ]
    );
}

#[test]
fn test_equality_rows_follow_constraint_order() {
    let m = mixed_problem();
    let (data, _) = Ecos::new().apply(&m.problem).unwrap();

    // eq_big: x0 - 1 == 0, x1 - 1 == 0; eq_small: x3 - 0.5 == 0
    let expected = DMatrix::from_row_slice(
        3,
        4,
        &[
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    );
    assert_eq!(csc_to_dense(&data.a), expected);
    assert_eq!(data.b.as_slice(), &[1.0, 1.0, 0.5]);
}

#[test]
fn test_identity_duals_recover_each_constraint() {
    let m = mixed_problem();
    let ecos = Ecos::with_backend(Scripted::new(counting_result));
    let solution = ecos
        .solve(&m.problem, false, false, &SolverOptions::new())
        .unwrap();

    let dual = |c: &Constraint| solution.dual(c).unwrap().as_slice().to_vec();

    // y = [0, 1, 2]
    assert_eq!(dual(&m.eq_big), vec![0.0, 1.0]);
    assert_eq!(dual(&m.eq_small), vec![2.0]);
    // z continues at 3: nonpos 3..7, soc 7..13, exp 13..19
    assert_eq!(dual(&m.nonpos), vec![3.0, 4.0, 5.0, 6.0]);
    assert_eq!(dual(&m.soc), vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    // exp rows come back as (x, y, z) triples
    assert_eq!(dual(&m.exp), vec![13.0, 15.0, 14.0, 16.0, 18.0, 17.0]);

    assert_eq!(solution.dual_vars.as_ref().unwrap().len(), 5);
}

#[test]
fn test_exp_cone_rows_in_solver_order() {
    let x = variable(3);
    let xe = AffineExpr::variable(&x);
    let exp = Constraint::exp_cone(
        xe.index(0).unwrap().plus(10.0),
        xe.index(1).unwrap().plus(20.0),
        xe.index(2).unwrap().plus(30.0),
    )
    .unwrap();
    let problem = Problem::minimize(xe.sum()).constraint(exp).build();

    let (data, _) = Ecos::new().apply(&problem).unwrap();
    assert_eq!(data.h.as_slice(), &[10.0, 30.0, 20.0]);
    let expected = DMatrix::from_row_slice(
        3,
        3,
        &[-1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, -1.0, 0.0],
    );
    assert_eq!(csc_to_dense(&data.g), expected);
}

#[test]
fn test_exp_cone_permutation_round_trip() {
    let block = [7.0, 8.0, 9.0];
    let forward = permute_exp_cone_rows(&block, &EXP_CONE_ORDER);
    assert_eq!(forward, vec![7.0, 9.0, 8.0]);
    assert_eq!(unpermute_exp_cone_rows(&forward, &EXP_CONE_ORDER), block.to_vec());
}

#[test]
fn test_status_totality() {
    let x = variable(1);
    let problem = Problem::minimize(AffineExpr::variable(&x)).build();
    let ecos = Ecos::new();
    let (_, inv) = ecos.apply(&problem).unwrap();

    for (&code, &status) in STATUS_MAP.iter() {
        let solution = ecos.invert(&raw_with_code(code, 1), &inv).unwrap();
        assert_eq!(solution.status, status, "exit code {}", code);
        assert_eq!(solution.has_solution(), status.is_solution_present());
    }

    for code in [3, 4, 13, -5, -6, -8, 42] {
        assert!(matches!(
            ecos.invert(&raw_with_code(code, 1), &inv),
            Err(ConifError::UnknownExitCode(c)) if c == code
        ));
    }
}

#[test]
fn test_offset_added_to_optimal_value() {
    // minimize 2x + 5, solver reports c'x = 3
    let x = variable(1);
    let obj = AffineExpr::variable(&x).scale(2.0).plus(5.0);
    let problem = Problem::minimize(obj).build();
    let ecos = Ecos::new();
    let (data, inv) = ecos.apply(&problem).unwrap();
    assert_eq!(data.c.as_slice(), &[2.0]);

    let mut raw = raw_with_code(0, 1);
    raw.x = vec![1.5];
    raw.info.pcost = 3.0;
    let solution = ecos.invert(&raw, &inv).unwrap();
    assert_eq!(solution.opt_val, Some(8.0));
    assert_eq!(solution.value(&x).unwrap().as_slice(), &[1.5]);
}

#[test]
fn test_infeasible_solution_shape() {
    let x = variable(2);
    let xe = AffineExpr::variable(&x);
    let problem = Problem::minimize(xe.sum())
        .constraint(xe.equals(&AffineExpr::scalar(0.0)).unwrap())
        .build();
    let ecos = Ecos::new();
    let (_, inv) = ecos.apply(&problem).unwrap();

    let solution = ecos.invert(&raw_with_code(1, 2), &inv).unwrap();
    assert_eq!(solution.status, SolveStatus::Infeasible);
    assert!(solution.primal_vars.is_none());
    assert!(solution.dual_vars.is_none());
    assert!(solution.opt_val.is_none());
}

#[test]
fn test_unsupported_constraint_rejected_before_solve() {
    let x = variable(4);
    let xe = AffineExpr::variable(&x);
    let problem = Problem::minimize(xe.sum())
        .subject_to([
            Constraint::nonpos(xe.clone()),
            Constraint::psd(xe.clone(), 2).unwrap(),
        ])
        .build();

    let ecos = Ecos::with_backend(Scripted::new(counting_result));
    let result = ecos.solve(&problem, false, false, &SolverOptions::new());
    assert!(matches!(result, Err(ConifError::UnsupportedConstraint(_))));
    assert_eq!(ecos.backend().calls.get(), 0);
}

#[test]
fn test_dual_map_completeness() {
    let x = variable(3);
    let xe = AffineExpr::variable(&x);
    let eq = xe.select(&[1, 2]).unwrap().equals(&AffineExpr::scalar(1.0)).unwrap();
    let soc = Constraint::soc(xe.index(0).unwrap(), xe.select(&[1, 2]).unwrap()).unwrap();
    let problem = Problem::minimize(xe.index(0).unwrap())
        .subject_to([eq.clone(), soc.clone()])
        .build();

    let ecos = Ecos::with_backend(Scripted::new(counting_result));
    let solution = ecos
        .solve(&problem, false, false, &SolverOptions::new())
        .unwrap();

    let duals = solution.dual_vars.as_ref().unwrap();
    assert_eq!(duals.len(), 2);
    assert_eq!(duals[&eq.id()].len(), eq.size());
    assert_eq!(duals[&soc.id()].len(), soc.size());
}

#[test]
fn test_options_pass_through_untouched() {
    let x = variable(1);
    let problem = Problem::minimize(AffineExpr::variable(&x))
        .constraint(Constraint::nonpos(AffineExpr::variable(&x).neg()))
        .build();
    let options = SolverOptions::new()
        .with("max_iters", 12)
        .with("made_up_option", "anything");

    let ecos = Ecos::with_backend(Scripted::new(counting_result));
    ecos.solve(&problem, true, true, &options).unwrap();
    assert_eq!(ecos.backend().last_options.borrow().as_ref(), Some(&options));
    assert_eq!(ecos.backend().calls.get(), 1);
}

#[test]
fn test_backend_fault_propagates() {
    let x = variable(1);
    let problem = Problem::minimize(AffineExpr::variable(&x)).build();
    let ecos = Ecos::with_backend(Scripted::new(|_: &SolverData| {
        Err(ConifError::SolverInternalError("ill-posed".into()))
    }));
    assert!(matches!(
        ecos.solve(&problem, false, false, &SolverOptions::new()),
        Err(ConifError::SolverInternalError(msg)) if msg == "ill-posed"
    ));
}

#[test]
fn test_short_dual_vector_is_an_error() {
    let m = mixed_problem();
    let ecos = Ecos::with_backend(Scripted::new(|data: &SolverData| {
        let mut raw = counting_result(data)?;
        raw.z.pop();
        Ok(raw)
    }));
    assert!(matches!(
        ecos.solve(&m.problem, false, false, &SolverOptions::new()),
        Err(ConifError::DimensionMismatch { what: "cone duals", .. })
    ));
}

#[test]
fn test_resolve_with_same_inverse_data() {
    let x = variable(2);
    let xe = AffineExpr::variable(&x);
    let problem = Problem::minimize(xe.sum().plus(1.0))
        .constraint(xe.geq(&AffineExpr::scalar(0.0)).unwrap())
        .build();

    let ecos = Ecos::with_backend(Scripted::new(counting_result));
    let (data, inv) = ecos.apply(&problem).unwrap();
    for warm_start in [false, true] {
        let raw = ecos
            .solve_via_data(&data, warm_start, false, &SolverOptions::new())
            .unwrap();
        let solution = ecos.invert(&raw, &inv).unwrap();
        assert_eq!(solution.opt_val, Some(1.0));
        assert_eq!(solution.value(&x).unwrap(), &DVector::<f64>::zeros(2));
    }
    assert_eq!(ecos.backend().calls.get(), 2);
}
