//! Decision variables and identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::SeqCst)
}

/// Unique identifier for a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u64);

impl VariableId {
    /// Generate a new unique ID.
    pub fn new() -> Self {
        VariableId(next_id())
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for VariableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var{}", self.0)
    }
}

/// Unique identifier for a constraint.
///
/// Dual values are reported keyed by this ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(u64);

impl ConstraintId {
    /// Generate a new unique ID.
    pub fn new() -> Self {
        ConstraintId(next_id())
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ConstraintId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constr{}", self.0)
    }
}

/// A flat block of decision variables `x` of length `size`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Unique ID.
    pub id: VariableId,
    /// Number of scalar entries.
    pub size: usize,
    /// Optional name for display.
    pub name: Option<String>,
}

impl Variable {
    /// Create a variable block with `size` entries.
    pub fn new(size: usize) -> Self {
        Variable {
            id: VariableId::new(),
            size,
            name: None,
        }
    }

    /// Give a name to this variable.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Create a variable block with `size` entries.
pub fn variable(size: usize) -> Variable {
    Variable::new(size)
}
