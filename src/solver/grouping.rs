//! Partitioning of a problem's constraints by cone.

use crate::constraints::{ConeKind, Constraint};
use crate::error::{ConifError, Result};

/// Constraints split by cone, each list in original relative order.
#[derive(Debug, Default)]
pub struct ConstraintGroups<'a> {
    pub zero: Vec<&'a Constraint>,
    pub nonpos: Vec<&'a Constraint>,
    pub soc: Vec<&'a Constraint>,
    pub exp: Vec<&'a Constraint>,
}

impl<'a> ConstraintGroups<'a> {
    /// The constraints that go into `G`: NonPos, then SOC, then ExpCone.
    pub fn non_equality(&self) -> Vec<&'a Constraint> {
        self.nonpos
            .iter()
            .chain(&self.soc)
            .chain(&self.exp)
            .copied()
            .collect()
    }
}

/// Split constraints into the four supported groups in a single pass.
///
/// Fails on the first constraint of any other kind.
pub fn group_constraints(constraints: &[Constraint]) -> Result<ConstraintGroups<'_>> {
    let mut groups = ConstraintGroups::default();

    for c in constraints {
        match c.cone_kind() {
            ConeKind::Zero => groups.zero.push(c),
            ConeKind::NonPos => groups.nonpos.push(c),
            ConeKind::Soc => groups.soc.push(c),
            ConeKind::ExpCone => groups.exp.push(c),
            other @ (ConeKind::NonNeg | ConeKind::Psd | ConeKind::PowCone3D) => {
                return Err(ConifError::UnsupportedConstraint(format!(
                    "{} constraint {}",
                    other,
                    c.id()
                )))
            }
        }
    }

    Ok(groups)
}
