//! Test harness / grader
//!
//! Owns the comparison rules and the per-case line format. The grader only
//! sees an [`EntryPointHandle`], so it is agnostic to how the submission was
//! loaded.

mod case;
mod compare;
mod grade;

pub use case::{CaseOutcome, CaseResult, TestCase};
pub use compare::{render_value, values_equal};
pub use grade::{GradeSummary, Grader};

use serde_json::Value;

/// An invocable entry point extracted from a submission
pub trait EntryPointHandle {
    /// Name the entry point was looked up by
    fn name(&self) -> &str;

    /// Call the entry point with `args`, returning its value or fault message
    fn invoke(&mut self, args: Vec<Value>) -> Result<Value, String>;
}
