//! Test case and per-case result types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of a problem's fixed test table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Positional arguments passed to the entry point
    pub input: Vec<Value>,

    /// Value the entry point must return
    pub expected: Value,
}

impl TestCase {
    pub fn new(input: Vec<Value>, expected: Value) -> Self {
        Self { input, expected }
    }

    /// Number of arguments this case passes
    pub fn arity(&self) -> usize {
        self.input.len()
    }
}

/// What invoking the entry point produced for one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// The entry point returned a value
    Returned(Value),
    /// The entry point raised a fault
    Faulted(String),
}

impl CaseOutcome {
    /// The returned value, if any
    pub fn value(&self) -> Option<&Value> {
        match self {
            CaseOutcome::Returned(value) => Some(value),
            CaseOutcome::Faulted(_) => None,
        }
    }

    /// The fault message, if any
    pub fn fault(&self) -> Option<&str> {
        match self {
            CaseOutcome::Returned(_) => None,
            CaseOutcome::Faulted(message) => Some(message),
        }
    }
}

/// Result of grading a single case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Position of the case in the table (0-based)
    pub index: usize,

    /// Arguments the case was invoked with
    pub input: Vec<Value>,

    /// Expected return value
    pub expected: Value,

    /// Actual outcome
    pub outcome: CaseOutcome,

    /// Whether the outcome matched the expectation
    pub passed: bool,
}
