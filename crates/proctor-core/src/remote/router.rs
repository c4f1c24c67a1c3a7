//! Cancellable dispatch of submissions to the judge

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{JudgeRequest, JudgeTransport, TransportError};
use crate::language::{Language, Submission};
use crate::report::{EvaluationReport, Verdict};
use crate::status::RunPermit;

/// Relays remote-only submissions to a [`JudgeTransport`]
#[derive(Clone)]
pub struct RemoteRouter {
    transport: Arc<dyn JudgeTransport>,
    timeout: Duration,
    problem_id: Option<String>,
}

impl std::fmt::Debug for RemoteRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteRouter")
            .field("timeout", &self.timeout)
            .field("problem_id", &self.problem_id)
            .finish()
    }
}

impl RemoteRouter {
    pub fn new(transport: Arc<dyn JudgeTransport>, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            problem_id: None,
        }
    }

    /// Tag every request with the problem being solved
    pub fn with_problem_id(mut self, problem_id: impl Into<String>) -> Self {
        self.problem_id = Some(problem_id.into());
        self
    }

    /// Spawn the round trip on `runtime`
    ///
    /// The permit travels with the task and is released when the task ends,
    /// whichever way it ends.
    pub fn dispatch(
        &self,
        runtime: &Handle,
        submission: Submission,
        permit: RunPermit,
    ) -> PendingEvaluation {
        let cancel = CancellationToken::new();
        let language = submission.language();
        let request = JudgeRequest::new(&submission, self.problem_id.clone());
        let transport = Arc::clone(&self.transport);
        let timeout = self.timeout;
        let token = cancel.clone();

        let handle = runtime.spawn(async move {
            let started_at = Utc::now();
            let (verdict, lines) = round_trip(transport.as_ref(), &request, timeout, &token).await;
            let report = EvaluationReport::new(language, verdict, lines, Vec::new(), started_at);
            tracing::info!(
                language = %language,
                verdict = %report.verdict,
                duration_ms = report.duration_ms(),
                "remote evaluation finished"
            );
            permit.finish();
            report
        });

        PendingEvaluation {
            handle,
            cancel,
            language,
        }
    }
}

async fn round_trip(
    transport: &dyn JudgeTransport,
    request: &JudgeRequest,
    timeout: Duration,
    cancel: &CancellationToken,
) -> (Verdict, Vec<String>) {
    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!("remote submission cancelled");
            return (Verdict::Cancelled, Vec::new());
        }
        result = tokio::time::timeout(timeout, transport.submit(request)) => {
            result.unwrap_or(Err(TransportError::Timeout(timeout)))
        }
    };

    match outcome {
        Ok(response) => (response.verdict, response.lines),
        Err(err) => {
            tracing::warn!(error = %err, "judge round trip failed");
            (
                Verdict::runtime_fault(format!("judge transport error: {}", err)),
                Vec::new(),
            )
        }
    }
}

/// A remote evaluation in flight
#[derive(Debug)]
pub struct PendingEvaluation {
    handle: JoinHandle<EvaluationReport>,
    cancel: CancellationToken,
    language: Language,
}

impl PendingEvaluation {
    /// Abandon the round trip; the evaluation resolves as cancelled
    ///
    /// Has no effect once the judge has answered.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this evaluation, for use from another task
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Wait for the report
    pub async fn wait(self) -> EvaluationReport {
        let started_at = Utc::now();
        match self.handle.await {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(error = %err, "remote evaluation task failed");
                EvaluationReport::new(
                    self.language,
                    Verdict::runtime_fault(format!("judge task failed: {}", err)),
                    Vec::new(),
                    Vec::new(),
                    started_at,
                )
            }
        }
    }
}
