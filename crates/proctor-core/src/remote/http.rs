//! HTTP judge client

use async_trait::async_trait;

use super::{JudgeConfig, JudgeRequest, JudgeResponse, JudgeTransport, TransportError};
use crate::error::{ProctorError, ProctorResult};

/// Longest slice of an error body kept in a transport error
const MAX_ERROR_BODY: usize = 200;

/// Posts submissions as JSON to the judge endpoint
#[derive(Debug, Clone)]
pub struct HttpJudge {
    client: reqwest::Client,
    config: JudgeConfig,
}

impl HttpJudge {
    pub fn new(config: JudgeConfig) -> ProctorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("proctor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProctorError::config_with_context(e.to_string(), "building judge HTTP client")
            })?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn map_error(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(self.config.timeout)
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else if error.is_decode() {
            TransportError::Decode(error.to_string())
        } else {
            TransportError::Request(error.to_string())
        }
    }
}

#[async_trait]
impl JudgeTransport for HttpJudge {
    async fn submit(&self, request: &JudgeRequest) -> Result<JudgeResponse, TransportError> {
        tracing::debug!(endpoint = %self.config.endpoint, language = %request.language, "posting submission to judge");

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.map_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
