//! Verdicts and evaluation reports
//!
//! An [`EvaluationReport`] is the only thing an evaluation hands back to the
//! caller: the verdict plus the diagnostic lines to display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ProctorError, ProctorResult};
use crate::grader::CaseResult;
use crate::language::Language;

/// Final classification of an evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Every case passed
    AllPassed,
    /// Some cases failed or faulted
    PartialPass { passed: usize, total: usize },
    /// The submission does not define the required function
    EntryPointMissing {
        #[serde(default)]
        entry_point: String,
    },
    /// Load-time fault, or a transport failure on the remote path
    RuntimeFault { message: String },
    /// A pending remote submission was cancelled
    Cancelled,
}

impl Verdict {
    /// Verdict for a graded run
    pub fn from_counts(passed: usize, total: usize) -> Self {
        if passed == total {
            Verdict::AllPassed
        } else {
            Verdict::PartialPass { passed, total }
        }
    }

    pub fn entry_point_missing(entry_point: impl Into<String>) -> Self {
        Verdict::EntryPointMissing {
            entry_point: entry_point.into(),
        }
    }

    pub fn runtime_fault(message: impl Into<String>) -> Self {
        Verdict::RuntimeFault {
            message: message.into(),
        }
    }

    /// Check if the verdict represents success
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::AllPassed)
    }

    /// Human-readable summary shown as the first report line
    pub fn summary_line(&self) -> String {
        match self {
            Verdict::AllPassed => "✅ All tests passed".to_string(),
            Verdict::PartialPass { passed, total } => {
                format!("⚠️ {}/{} tests passed", passed, total)
            }
            Verdict::EntryPointMissing { entry_point } if entry_point.is_empty() => {
                "❌ Could not find the required function".to_string()
            }
            Verdict::EntryPointMissing { entry_point } => {
                format!("❌ Could not find a function named {}", entry_point)
            }
            Verdict::RuntimeFault { message } => format!("💥 Runtime error: {}", message),
            Verdict::Cancelled => "🛑 Submission cancelled".to_string(),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary_line())
    }
}

/// Everything an evaluation produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Unique id of this evaluation
    pub id: Uuid,

    /// Language of the evaluated submission
    pub language: Language,

    /// Final verdict
    pub verdict: Verdict,

    /// Summary line, blank separator, then captured and per-case lines
    pub lines: Vec<String>,

    /// Per-case results; empty when grading did not happen locally
    #[serde(default)]
    pub cases: Vec<CaseResult>,

    /// When the evaluation started
    pub started_at: DateTime<Utc>,

    /// When the report was produced
    pub finished_at: DateTime<Utc>,
}

impl EvaluationReport {
    /// Assemble a report; `output` follows the summary line and a blank line
    pub fn new(
        language: Language,
        verdict: Verdict,
        output: Vec<String>,
        cases: Vec<CaseResult>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut lines = Vec::with_capacity(output.len() + 2);
        lines.push(verdict.summary_line());
        lines.push(String::new());
        lines.extend(output);

        Self {
            id: Uuid::new_v4(),
            language,
            verdict,
            lines,
            cases,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Diagnostic lines for display
    pub fn diagnostic_lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of cases that passed
    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    /// Number of cases graded
    pub fn total_count(&self) -> usize {
        self.cases.len()
    }

    /// Wall time of the evaluation in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Lines joined for display, as the output pane shows them
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Render a report in the requested format
pub fn render_report(report: &EvaluationReport, format: ReportFormat) -> ProctorResult<String> {
    match format {
        ReportFormat::Text => Ok(report.render()),
        ReportFormat::Json => serde_json::to_string_pretty(report).map_err(ProctorError::from),
    }
}
