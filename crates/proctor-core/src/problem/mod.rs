//! Problem definitions
//!
//! A problem names the entry point a submission must define and carries the
//! fixed test table it is graded against, plus per-language starter code.

mod loader;

pub use loader::ProblemLoader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ProctorError, ProctorResult};
use crate::grader::TestCase;
use crate::language::Language;

const TWO_SUM_YAML: &str = include_str!("../../problems/two_sum.yaml");

/// A gradable coding problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Unique problem identifier
    pub id: String,

    /// Short human-readable title
    pub title: String,

    /// Problem statement shown to the candidate
    #[serde(default)]
    pub statement: String,

    /// Name of the function the submission must define
    pub entry_point: String,

    /// Parameter names, used when rendering case inputs
    #[serde(default)]
    pub params: Vec<String>,

    /// Ordered test table
    #[serde(default)]
    pub cases: Vec<TestCase>,

    /// Starter source per language
    #[serde(default)]
    pub starters: BTreeMap<Language, String>,
}

impl Problem {
    /// The built-in Two Sum problem
    pub fn two_sum() -> ProctorResult<Self> {
        Self::from_yaml(TWO_SUM_YAML)
    }

    /// Parse and validate a problem from YAML
    pub fn from_yaml(yaml: &str) -> ProctorResult<Self> {
        let problem: Problem = serde_yaml::from_str(yaml)?;
        problem.validate()?;
        Ok(problem)
    }

    /// Parse and validate a problem from JSON
    pub fn from_json(json: &str) -> ProctorResult<Self> {
        let problem: Problem = serde_json::from_str(json)?;
        problem.validate()?;
        Ok(problem)
    }

    /// Reject problems the grader cannot run meaningfully
    pub fn validate(&self) -> ProctorResult<()> {
        if self.id.trim().is_empty() {
            return Err(ProctorError::invalid_problem("", "problem id is empty"));
        }
        if self.entry_point.trim().is_empty() {
            return Err(ProctorError::invalid_problem(&self.id, "entry point is empty"));
        }
        if !self.params.is_empty() {
            if let Some((index, case)) = self
                .cases
                .iter()
                .enumerate()
                .find(|(_, case)| case.arity() != self.params.len())
            {
                return Err(ProctorError::invalid_problem(
                    &self.id,
                    format!(
                        "case {} passes {} argument(s) but {} parameter(s) are declared",
                        index,
                        case.arity(),
                        self.params.len()
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Number of arguments the entry point takes, when it can be known
    pub fn arity(&self) -> Option<usize> {
        if !self.params.is_empty() {
            return Some(self.params.len());
        }
        self.cases.first().map(TestCase::arity)
    }

    /// Starter source for `language`, if the problem ships one
    pub fn starter(&self, language: Language) -> Option<&str> {
        self.starters.get(&language).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_two_sum() {
        let problem = Problem::two_sum().unwrap();
        assert_eq!(problem.id, "two-sum");
        assert_eq!(problem.title, "Two Sum (simple variant)");
        assert_eq!(problem.entry_point, "twoSum");
        assert_eq!(problem.params, vec!["nums", "target"]);
        assert_eq!(problem.arity(), Some(2));
        assert_eq!(problem.cases.len(), 4);
        assert_eq!(problem.cases[0].input, vec![json!([2, 7, 11, 15]), json!(9)]);
        assert_eq!(problem.cases[3].expected, json!([-1, -1]));

        for language in Language::all() {
            assert!(problem.starter(*language).is_some(), "{} starter", language);
        }
    }

    #[test]
    fn test_validate_rejects_empty_entry_point() {
        let mut problem = Problem::two_sum().unwrap();
        problem.entry_point = String::new();
        let err = problem.validate().unwrap_err();
        assert!(matches!(err, ProctorError::InvalidProblem { .. }));
    }

    #[test]
    fn test_validate_rejects_arity_mismatch() {
        let mut problem = Problem::two_sum().unwrap();
        problem.cases.push(TestCase::new(vec![json!([1])], json!([-1, -1])));
        let err = problem.validate().unwrap_err();
        assert!(err.to_string().contains("case 4 passes 1 argument(s)"));
    }

    #[test]
    fn test_from_json_minimal() {
        let problem = Problem::from_json(
            r#"{"id": "echo", "title": "Echo", "entry_point": "echo",
                "cases": [{"input": ["hi"], "expected": "hi"}]}"#,
        )
        .unwrap();
        assert_eq!(problem.arity(), Some(1));
        assert!(problem.starters.is_empty());
    }
}
