//! Runs a problem's test table against an entry point

use serde_json::Value;

use super::compare::{render_value, values_equal};
use super::{CaseOutcome, CaseResult, EntryPointHandle, TestCase};
use crate::report::Verdict;

/// Outcome of grading every case in a table
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSummary {
    pub results: Vec<CaseResult>,
}

impl GradeSummary {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_counts(self.passed(), self.total())
    }
}

/// Deterministic grader over a fixed, ordered test table
pub struct Grader<'a> {
    cases: &'a [TestCase],
    params: &'a [String],
}

impl<'a> Grader<'a> {
    /// `params` names the entry point's parameters for display
    pub fn new(cases: &'a [TestCase], params: &'a [String]) -> Self {
        Self { cases, params }
    }

    /// Invoke `handle` once per case, in table order
    ///
    /// Each invocation gets its own copy of the case input. A fault fails
    /// that case only; grading carries on with the rest. One line per case
    /// is handed to `record` right after the invocation returns, so output
    /// the submission printed during a case lands before that case's line.
    pub fn grade<H>(&self, handle: &mut H, mut record: impl FnMut(String)) -> GradeSummary
    where
        H: EntryPointHandle + ?Sized,
    {
        let mut results = Vec::with_capacity(self.cases.len());

        for (index, case) in self.cases.iter().enumerate() {
            let outcome = match handle.invoke(case.input.clone()) {
                Ok(value) => CaseOutcome::Returned(value),
                Err(message) => CaseOutcome::Faulted(message),
            };
            let passed = outcome
                .value()
                .is_some_and(|actual| values_equal(actual, &case.expected));

            tracing::debug!(
                entry_point = handle.name(),
                case = index,
                passed,
                "graded case"
            );

            record(self.case_line(case, &outcome, passed));
            results.push(CaseResult {
                index,
                input: case.input.clone(),
                expected: case.expected.clone(),
                outcome,
                passed,
            });
        }

        GradeSummary { results }
    }

    fn case_line(&self, case: &TestCase, outcome: &CaseOutcome, passed: bool) -> String {
        let args = self.describe_input(&case.input);
        let got = match outcome {
            CaseOutcome::Returned(value) => format!("got {}", render_value(value)),
            CaseOutcome::Faulted(message) => format!("error: {}", message),
        };
        let mark = if passed {
            "✓".to_string()
        } else {
            format!("≠ want {}", render_value(&case.expected))
        };
        format!("test {} => {} {}", args, got, mark)
    }

    fn describe_input(&self, input: &[Value]) -> String {
        input
            .iter()
            .enumerate()
            .map(|(i, value)| match self.params.get(i) {
                Some(name) => format!("{}={}", name, render_value(value)),
                None => format!("arg{}={}", i, render_value(value)),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
