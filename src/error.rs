//! Error types for conif.

use thiserror::Error;

/// Error type for conif operations.
///
/// These are conditions under which the adapter itself cannot translate a
/// problem or a result. Infeasible, unbounded and inaccurate solver outcomes
/// are not errors; they come back as a [`Solution`](crate::Solution) status.
#[derive(Debug, Error)]
pub enum ConifError {
    /// A constraint kind the target solver cannot encode.
    #[error("Unsupported constraint: {0}")]
    UnsupportedConstraint(String),

    /// The objective is not a scalar affine minimization over one variable block.
    #[error("Malformed objective: {0}")]
    MalformedObjective(String),

    /// The solver returned an exit code outside the known status table.
    #[error("Unknown solver exit code: {0}")]
    UnknownExitCode(i32),

    /// The solver itself faulted.
    #[error("Solver internal error: {0}")]
    SolverInternalError(String),

    /// Shape mismatch between constraint arguments.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// An expression references a variable outside the problem's block.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// A raw solver vector does not match the recorded constraint layout.
    #[error("Dimension mismatch in {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}

/// Result type for conif operations.
pub type Result<T> = std::result::Result<T, ConifError>;
