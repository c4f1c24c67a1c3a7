//! Proctor Core Library
//!
//! Code execution and grading harness for coding-interview submissions.
//!
//! # Features
//!
//! - **Sandboxed local evaluation**: Rhai submissions run in a fresh,
//!   resource-limited interpreter with no file, network or module access
//! - **Output capture**: submitted `print`/`debug` output is redirected into
//!   a scoped buffer that is always released
//! - **Deterministic grading**: a fixed test table, per-case fault isolation
//!   and a one-line-per-case transcript
//! - **Remote judge dispatch**: other languages are relayed to an external
//!   judge as a cancellable task
//! - **Status gate**: one evaluation in flight per harness
//!
//! # Example
//!
//! ```rust,ignore
//! use proctor_core::{Harness, HarnessConfig, Problem};
//!
//! let harness = Harness::new(HarnessConfig::default(), Problem::two_sum()?)?;
//! let report = harness.run_local("fn twoSum(nums, target) { [-1, -1] }")?;
//! println!("{}", report.render());
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod grader;
pub mod harness;
pub mod language;
pub mod problem;
pub mod remote;
pub mod report;
pub mod sandbox;
pub mod status;

// Re-exports for convenience
pub use capture::{CaptureGuard, CaptureOptions, DiagnosticChannel, LineSink};
pub use config::HarnessConfig;
pub use error::{ProctorError, ProctorResult};
pub use grader::{CaseOutcome, CaseResult, Grader, TestCase};
pub use harness::Harness;
pub use language::{Language, Submission};
pub use problem::{Problem, ProblemLoader};
pub use remote::{HttpJudge, JudgeConfig, JudgeTransport, PendingEvaluation};
pub use report::{EvaluationReport, ReportFormat, Verdict, render_report};
pub use sandbox::{LocalExecutor, SandboxLimits};
pub use status::{ExecutionStatus, StatusController};
