//! Remote submission router
//!
//! Languages the local executor cannot run are relayed to an external judge.
//! The judge owns grading for those languages; this module only packages the
//! submission, drives the round trip as a cancellable task and turns the
//! response (or the transport fault) into an evaluation report.

mod http;
mod router;
mod wire;

pub use http::HttpJudge;
pub use router::{PendingEvaluation, RemoteRouter};
pub use wire::{JudgeRequest, JudgeResponse, TransportError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding [`JudgeConfig::endpoint`]
pub const JUDGE_ENDPOINT_ENV: &str = "PROCTOR_JUDGE_ENDPOINT";

/// Where and how long to talk to the judge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Judge submission URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Upper bound on one round trip
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000/api/submit_code".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: default_timeout(),
        }
    }
}

impl JudgeConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Transport to the external judge
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JudgeTransport: Send + Sync {
    /// Send one submission and wait for the judge's answer
    async fn submit(&self, request: &JudgeRequest) -> Result<JudgeResponse, TransportError>;
}
