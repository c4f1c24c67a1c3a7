//! Execution status controller
//!
//! A three-state gate (`Idle -> Running -> Done`) that allows exactly one
//! evaluation in flight per harness. `Done` behaves like `Idle` for gating,
//! so the harness is reusable indefinitely.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::{ProctorError, ProctorResult};

/// Status of the harness as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Idle,
    Running,
    Done,
}

impl ExecutionStatus {
    /// Whether a new run would currently be accepted
    pub fn accepts_run(&self) -> bool {
        !matches!(self, ExecutionStatus::Running)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExecutionStatus::Idle => "idle",
            ExecutionStatus::Running => "running",
            ExecutionStatus::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Owner of the process-wide status flag
#[derive(Debug, Clone)]
pub struct StatusController {
    tx: Arc<watch::Sender<ExecutionStatus>>,
}

impl Default for StatusController {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusController {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ExecutionStatus::Idle);
        Self { tx: Arc::new(tx) }
    }

    /// Current status
    pub fn status(&self) -> ExecutionStatus {
        *self.tx.borrow()
    }

    /// Receive every status transition
    pub fn subscribe(&self) -> watch::Receiver<ExecutionStatus> {
        self.tx.subscribe()
    }

    /// Transition to `Running`, or fail with [`ProctorError::Busy`]
    ///
    /// The check and the transition happen under one lock, so two callers
    /// can never both acquire a permit.
    pub fn try_begin(&self) -> ProctorResult<RunPermit> {
        let acquired = self.tx.send_if_modified(|status| {
            if status.accepts_run() {
                *status = ExecutionStatus::Running;
                true
            } else {
                false
            }
        });

        if !acquired {
            tracing::debug!("run rejected, evaluation already in flight");
            return Err(ProctorError::Busy);
        }

        Ok(RunPermit {
            tx: Arc::clone(&self.tx),
            finished: false,
        })
    }
}

/// Proof that the holder owns the `Running` state
///
/// Finishing (explicitly or by dropping) moves the status to `Done`
/// exactly once, so no exit path can leave the harness busy.
#[derive(Debug)]
pub struct RunPermit {
    tx: Arc<watch::Sender<ExecutionStatus>>,
    finished: bool,
}

impl RunPermit {
    /// Mark the evaluation as done
    pub fn finish(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.finished {
            self.finished = true;
            self.tx.send_replace(ExecutionStatus::Done);
        }
    }
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_is_idle() {
        let controller = StatusController::new();
        assert_eq!(controller.status(), ExecutionStatus::Idle);
    }

    #[test]
    fn test_second_run_rejected_while_running() {
        let controller = StatusController::new();
        let permit = controller.try_begin().unwrap();
        assert_eq!(controller.status(), ExecutionStatus::Running);

        assert!(matches!(controller.try_begin(), Err(ProctorError::Busy)));

        permit.finish();
        assert_eq!(controller.status(), ExecutionStatus::Done);
        assert!(controller.try_begin().is_ok());
    }

    #[test]
    fn test_dropped_permit_releases() {
        let controller = StatusController::new();
        {
            let _permit = controller.try_begin().unwrap();
        }
        assert_eq!(controller.status(), ExecutionStatus::Done);
    }

    #[test]
    fn test_clones_share_state() {
        let controller = StatusController::new();
        let other = controller.clone();
        let _permit = controller.try_begin().unwrap();
        assert_eq!(other.status(), ExecutionStatus::Running);
        assert!(other.try_begin().is_err());
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let controller = StatusController::new();
        let mut rx = controller.subscribe();

        let permit = controller.try_begin().unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), ExecutionStatus::Running);

        permit.finish();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), ExecutionStatus::Done);
    }

    #[test]
    fn test_reusable_across_many_runs() {
        let controller = StatusController::new();
        for _ in 0..10 {
            controller.try_begin().unwrap().finish();
        }
        assert_eq!(controller.status(), ExecutionStatus::Done);
    }
}
