//! Interface to ECOS-convention solvers.
//!
//! `apply` stuffs a [`Problem`] into `(c, G, h, dims, A, b)`, keeping the
//! ordered constraint layouts it used; `invert` maps the raw result back onto
//! the problem's variable and constraints. The numeric solve in between is
//! delegated to a [`ConeProgramBackend`].

use std::collections::HashMap;

use nalgebra::DVector;

use super::backend::ConeProgramBackend;
use super::clarabel::ClarabelBackend;
use super::data::{ConeDims, ConstraintLayout, InverseData, RawSolution, SolverData};
use super::grouping::group_constraints;
use super::options::SolverOptions;
use super::solution::{SolveAttributes, Solution};
use super::status::status_from_exit_code;
use super::stuffing::{get_dual_values, group_coeff_offset};
use crate::constraints::ConeKind;
use crate::error::{ConifError, Result};
use crate::expr::Variable;
use crate::problem::{Objective, Problem};

/// Solver name.
pub const ECOS: &str = "ECOS";

/// ECOS cannot handle integer variables.
pub const MIP_CAPABLE: bool = false;

/// Constraint kinds ECOS can encode.
pub const SUPPORTED_CONSTRAINTS: [ConeKind; 4] = [
    ConeKind::Zero,
    ConeKind::NonPos,
    ConeKind::Soc,
    ConeKind::ExpCone,
];

/// Where argument `i` of an exponential cone goes among the cone's three
/// solver rows. ECOS orders the cone as `(x, z, y)`.
pub const EXP_CONE_ORDER: [usize; 3] = [0, 2, 1];

/// The ECOS interface, generic over the backend that does the numeric work.
#[derive(Debug, Clone, Default)]
pub struct Ecos<B = ClarabelBackend> {
    backend: B,
}

impl Ecos<ClarabelBackend> {
    /// ECOS interface running on the bundled Clarabel backend.
    pub fn new() -> Self {
        Ecos {
            backend: ClarabelBackend,
        }
    }
}

impl<B: ConeProgramBackend> Ecos<B> {
    /// ECOS interface over a custom backend.
    pub fn with_backend(backend: B) -> Self {
        Ecos { backend }
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The name of the solver.
    pub fn name(&self) -> &'static str {
        ECOS
    }

    /// Whether mixed-integer problems are supported.
    pub fn mip_capable(&self) -> bool {
        MIP_CAPABLE
    }

    /// Constraint kinds this interface can encode.
    pub fn supported_constraints(&self) -> &'static [ConeKind] {
        &SUPPORTED_CONSTRAINTS
    }

    /// Whether `apply` can take this problem: a scalar minimization over a
    /// single variable block with only supported constraint kinds.
    pub fn accepts(&self, problem: &Problem) -> bool {
        problem.objective.is_minimize()
            && problem.objective.expr().size() == 1
            && problem.variables().len() == 1
            && problem
                .constraints
                .iter()
                .all(|c| SUPPORTED_CONSTRAINTS.contains(&c.cone_kind()))
    }

    /// Returns the solver arguments and the data needed to invert the result.
    pub fn apply(&self, problem: &Problem) -> Result<(SolverData, InverseData)> {
        let var = single_variable(problem)?;
        let objective = match &problem.objective {
            Objective::Minimize(e) if e.size() == 1 => e,
            Objective::Minimize(e) => {
                return Err(ConifError::MalformedObjective(format!(
                    "objective must be scalar, got {} entries",
                    e.size()
                )))
            }
            Objective::Maximize(_) => {
                return Err(ConifError::MalformedObjective(
                    "expected a minimization".into(),
                ))
            }
        };

        let groups = group_constraints(&problem.constraints)?;

        let (c_row, offset) = objective.coeff_offset(&var)?;
        let mut c = DVector::zeros(var.size);
        for (_row, col, val) in c_row.triplet_iter() {
            c[col] += *val;
        }
        let offset = offset[0];

        let (a, b) = group_coeff_offset(&groups.zero, &var, &EXP_CONE_ORDER)?;

        let dims = ConeDims {
            l: groups.nonpos.iter().map(|c| c.size()).sum(),
            q: groups.soc.iter().flat_map(|c| c.cone_sizes()).collect(),
            e: groups.exp.iter().map(|c| c.num_cones()).sum(),
        };

        let neq_constr = groups.non_equality();
        let (g, h) = group_coeff_offset(&neq_constr, &var, &EXP_CONE_ORDER)?;

        log::debug!(
            "{} apply: n={} eq_rows={} dims l={} q={:?} e={}",
            ECOS,
            var.size,
            a.nrows(),
            dims.l,
            dims.q,
            dims.e
        );

        let inverse_data = InverseData {
            var_id: var.id,
            var_size: var.size,
            offset,
            eq_constr: groups.zero.iter().map(|c| ConstraintLayout::from(*c)).collect(),
            neq_constr: neq_constr.iter().map(|c| ConstraintLayout::from(*c)).collect(),
        };

        let data = SolverData {
            c,
            offset,
            a,
            b,
            g,
            h,
            dims,
        };

        Ok((data, inverse_data))
    }

    /// Run the backend on stuffed data. Options are passed through untouched.
    pub fn solve_via_data(
        &self,
        data: &SolverData,
        warm_start: bool,
        verbose: bool,
        options: &SolverOptions,
    ) -> Result<RawSolution> {
        self.backend.solve(data, warm_start, verbose, options)
    }

    /// Returns the solution to the original problem, given the inverse data.
    pub fn invert(&self, solution: &RawSolution, inverse_data: &InverseData) -> Result<Solution> {
        let status = status_from_exit_code(solution.info.exit_flag)?;
        log::debug!(
            "{} exit flag {} -> {}",
            ECOS,
            solution.info.exit_flag,
            status
        );

        let attr = SolveAttributes {
            solve_time: solution.info.timing.tsolve,
            setup_time: solution.info.timing.tsetup,
            num_iters: solution.info.iter,
        };

        if !status.is_solution_present() {
            return Ok(Solution::failure(status, attr));
        }

        if solution.x.len() != inverse_data.var_size {
            return Err(ConifError::DimensionMismatch {
                what: "primal solution",
                expected: inverse_data.var_size,
                got: solution.x.len(),
            });
        }

        let opt_val = solution.info.pcost + inverse_data.offset;

        let mut primal_vars = HashMap::with_capacity(1);
        primal_vars.insert(inverse_data.var_id, DVector::from_column_slice(&solution.x));

        let mut dual_vars = get_dual_values(
            &solution.y,
            &inverse_data.eq_constr,
            &EXP_CONE_ORDER,
            "equality duals",
        )?;
        let leq_dual = get_dual_values(
            &solution.z,
            &inverse_data.neq_constr,
            &EXP_CONE_ORDER,
            "cone duals",
        )?;
        dual_vars.extend(leq_dual);

        Ok(Solution::new(status, opt_val, primal_vars, dual_vars, attr))
    }

    /// `apply`, `solve_via_data` and `invert` in one call.
    pub fn solve(
        &self,
        problem: &Problem,
        warm_start: bool,
        verbose: bool,
        options: &SolverOptions,
    ) -> Result<Solution> {
        let (data, inverse_data) = self.apply(problem)?;
        let raw = self.solve_via_data(&data, warm_start, verbose, options)?;
        self.invert(&raw, &inverse_data)
    }
}

/// The problem's only variable block.
fn single_variable(problem: &Problem) -> Result<Variable> {
    match problem.variables().as_slice() {
        [(id, size)] => Ok(Variable {
            id: *id,
            size: *size,
            name: None,
        }),
        [] => Err(ConifError::MalformedObjective(
            "problem has no variables".into(),
        )),
        vars => Err(ConifError::MalformedObjective(format!(
            "expected a single variable block, found {}",
            vars.len()
        ))),
    }
}
