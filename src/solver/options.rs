//! Open-ended solver options.
//!
//! The adapter never looks inside these; they travel untouched to the
//! backend, which decides what it recognizes.

use std::collections::BTreeMap;
use std::fmt;

/// A single option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl OptionValue {
    /// Numeric value, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Float(v) => Some(*v),
            OptionValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Non-negative integer value.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            OptionValue::Int(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(v) => write!(f, "{}", v),
            OptionValue::Int(v) => write!(f, "{}", v),
            OptionValue::Float(v) => write!(f, "{}", v),
            OptionValue::Str(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Int(v as i64)
    }
}

impl From<u32> for OptionValue {
    fn from(v: u32) -> Self {
        OptionValue::Int(v as i64)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

/// Solver options by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverOptions {
    entries: BTreeMap<String, OptionValue>,
}

impl SolverOptions {
    /// No options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set an option, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Look up an option.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(name)
    }

    /// Iterate options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for SolverOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = SolverOptions::new();
        for (k, v) in iter {
            options.set(k, v);
        }
        options
    }
}
