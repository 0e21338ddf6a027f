//! Front-end side of `POST /process`.
//!
//! [`ProcessClient`] performs one request. [`Session`] is the state a front-end
//! keeps between refreshes: the parameters it sends and the last data it
//! successfully received. A failed refresh never clobbers that data.

use std::time::Duration;

use thiserror::Error;

use crate::wire::{ErrorBody, ProcessParams, SignalData};

/// Timeout applied to each request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct ProcessClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ProcessClient {
    /// Client for a server at `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ProcessClient {
            http,
            endpoint: format!("{}/process", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `params` and decode the result.
    pub async fn process(&self, params: &ProcessParams) -> Result<SignalData, ClientError> {
        let response = self.http.post(&self.endpoint).json(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let data: SignalData =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Malformed(e.to_string()))?;
        if !data.is_consistent() {
            return Err(ClientError::Malformed(format!(
                "array lengths differ: t={}, x1={}, x2={}, y={}",
                data.t.len(),
                data.x1.len(),
                data.x2.len(),
                data.y.len()
            )));
        }
        Ok(data)
    }
}

/// Caller-held state between refreshes.
#[derive(Debug, Clone)]
pub struct Session {
    pub params: ProcessParams,
    last: Option<SignalData>,
}

impl Session {
    pub fn new(params: ProcessParams) -> Self {
        Session { params, last: None }
    }

    /// Most recent successful result, if any.
    pub fn last(&self) -> Option<&SignalData> {
        self.last.as_ref()
    }

    /// Fetch once with the current parameters. On failure the condition is
    /// logged, previous data is kept, and `false` is returned.
    pub async fn refresh(&mut self, client: &ProcessClient) -> bool {
        match client.process(&self.params).await {
            Ok(data) => {
                tracing::debug!(samples = data.len(), rms = data.rms, "session refreshed");
                self.last = Some(data);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, endpoint = client.endpoint(), "no data");
                false
            }
        }
    }
}
