//! Judge wire types

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::language::{Language, Submission};
use crate::report::Verdict;

/// Body posted to the judge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeRequest {
    pub language: Language,

    #[serde(rename = "code")]
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<String>,
}

impl JudgeRequest {
    pub fn new(submission: &Submission, problem_id: Option<String>) -> Self {
        Self {
            language: submission.language(),
            source: submission.source().to_string(),
            problem_id,
        }
    }
}

/// Verdict-equivalent payload returned by the judge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeResponse {
    pub verdict: Verdict,

    #[serde(default)]
    pub lines: Vec<String>,
}

/// Failure to complete a judge round trip
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("failed to connect to judge: {0}")]
    Connect(String),

    #[error("judge responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("judge did not answer within {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("malformed judge response: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Request(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let submission = Submission::new(Language::Python, "def two_sum(): pass");
        let request = JudgeRequest::new(&submission, None);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"language": "python", "code": "def two_sum(): pass"})
        );

        let request = JudgeRequest::new(&submission, Some("two-sum".to_string()));
        assert_eq!(serde_json::to_value(&request).unwrap()["problem_id"], "two-sum");
    }

    #[test]
    fn test_response_decodes() {
        let response: JudgeResponse = serde_json::from_value(json!({
            "verdict": {"kind": "partial_pass", "passed": 2, "total": 4},
            "lines": ["test 1 ok"]
        }))
        .unwrap();
        assert_eq!(response.verdict, Verdict::from_counts(2, 4));
        assert_eq!(response.lines, vec!["test 1 ok"]);
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(
            TransportError::Timeout(Duration::from_secs(30)).to_string(),
            "judge did not answer within 30000ms"
        );
    }
}
