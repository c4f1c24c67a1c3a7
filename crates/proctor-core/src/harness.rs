//! Harness facade
//!
//! Ties the status gate, the capture proxy, the local executor, the grader
//! and the remote router together for one problem.

use chrono::Utc;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::capture::DiagnosticChannel;
use crate::config::HarnessConfig;
use crate::error::{ProctorError, ProctorResult};
use crate::grader::Grader;
use crate::language::{Language, Submission};
use crate::problem::Problem;
use crate::remote::{HttpJudge, JudgeTransport, PendingEvaluation, RemoteRouter};
use crate::report::{EvaluationReport, Verdict};
use crate::sandbox::{LoadOutcome, LocalExecutor};
use crate::status::{ExecutionStatus, StatusController};

/// Evaluates submissions against a single problem
///
/// At most one evaluation is in flight at a time; a second request while
/// one is running fails with [`ProctorError::Busy`].
#[derive(Debug)]
pub struct Harness {
    config: HarnessConfig,
    problem: Problem,
    channel: DiagnosticChannel,
    status: StatusController,
    executor: LocalExecutor,
    router: RemoteRouter,
}

impl Harness {
    /// Build a harness that talks to the configured HTTP judge
    pub fn new(config: HarnessConfig, problem: Problem) -> ProctorResult<Self> {
        problem.validate()?;
        let transport = Arc::new(HttpJudge::new(config.judge.clone())?);
        Ok(Self::assemble(config, problem, transport))
    }

    /// Replace the judge transport
    pub fn with_transport(mut self, transport: Arc<dyn JudgeTransport>) -> Self {
        self.router = RemoteRouter::new(transport, self.config.judge.timeout)
            .with_problem_id(self.problem.id.clone());
        self
    }

    /// Route submitted output through `channel` instead of the default one
    pub fn with_channel(mut self, channel: DiagnosticChannel) -> Self {
        self.channel = channel;
        self
    }

    fn assemble(config: HarnessConfig, problem: Problem, transport: Arc<dyn JudgeTransport>) -> Self {
        let executor = LocalExecutor::new(config.sandbox.clone());
        let router = RemoteRouter::new(transport, config.judge.timeout)
            .with_problem_id(problem.id.clone());
        Self {
            config,
            problem,
            channel: DiagnosticChannel::default(),
            status: StatusController::new(),
            executor,
            router,
        }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The channel submitted code prints through
    pub fn channel(&self) -> &DiagnosticChannel {
        &self.channel
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status.status()
    }

    /// Observe status transitions
    pub fn subscribe(&self) -> watch::Receiver<ExecutionStatus> {
        self.status.subscribe()
    }

    /// Evaluate Rhai `source` in-process and grade it
    pub fn run_local(&self, source: &str) -> ProctorResult<EvaluationReport> {
        self.run_local_submission(&Submission::new(Language::Rhai, source))
    }

    /// Evaluate a locally runnable submission and grade it
    ///
    /// Runs synchronously from capture to release. Faults raised by the
    /// submission end up in the report's verdict, never in the error.
    pub fn run_local_submission(&self, submission: &Submission) -> ProctorResult<EvaluationReport> {
        let language = submission.language();
        if !language.is_local() {
            return Err(ProctorError::unsupported_language(language.as_str(), "local"));
        }

        let permit = self.status.try_begin()?;
        let started_at = Utc::now();
        tracing::info!(problem = %self.problem.id, language = %language, "local evaluation started");

        let mut capture = self.channel.begin_capture(&self.config.capture);
        let loaded = self.executor.load(
            submission.source(),
            &self.problem.entry_point,
            self.problem.arity(),
            &self.channel,
        );

        let (verdict, cases) = match loaded {
            LoadOutcome::Ready(mut entry) => {
                let summary = Grader::new(&self.problem.cases, &self.problem.params)
                    .grade(&mut entry, |line| capture.record(line));
                (summary.verdict(), summary.results)
            }
            LoadOutcome::EntryPointMissing => (
                Verdict::entry_point_missing(self.problem.entry_point.clone()),
                Vec::new(),
            ),
            LoadOutcome::Fault(message) => (Verdict::runtime_fault(message), Vec::new()),
        };
        let output = capture.end();

        let report = EvaluationReport::new(language, verdict, output, cases, started_at);
        tracing::info!(
            problem = %self.problem.id,
            verdict = %report.verdict,
            duration_ms = report.duration_ms(),
            "local evaluation finished"
        );
        permit.finish();
        Ok(report)
    }

    /// Dispatch a remote-only submission to the judge
    ///
    /// Must be called from within a Tokio runtime. The harness stays
    /// `Running` until the returned evaluation settles or is cancelled.
    pub fn run_remote(
        &self,
        language: Language,
        source: impl Into<String>,
    ) -> ProctorResult<PendingEvaluation> {
        if language.is_local() {
            return Err(ProctorError::unsupported_language(language.as_str(), "remote"));
        }
        let runtime = Handle::try_current().map_err(|_| ProctorError::NoRuntime)?;

        let permit = self.status.try_begin()?;
        tracing::info!(problem = %self.problem.id, language = %language, "remote evaluation started");
        Ok(self
            .router
            .dispatch(&runtime, Submission::new(language, source), permit))
    }

    /// Evaluate a submission on whichever path its language needs
    pub async fn run(&self, submission: Submission) -> ProctorResult<EvaluationReport> {
        if submission.language().is_local() {
            return self.run_local_submission(&submission);
        }
        let pending = self.run_remote(submission.language(), submission.source())?;
        Ok(pending.wait().await)
    }
}
