use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, warn};

use crate::analyze::{AnalysisResult, IssueRequest};
use crate::config::UiConfig;
use crate::error::{transport_failure, UserError};

/// What came back from one submission to the analysis API
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Analyzed(AnalysisResult),
    NotFound,
    Failed(u16),
    /// The request never produced a usable answer
    Transport(UserError),
}

impl SubmitOutcome {
    /// Classify a backend answer by status code
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            200 => match serde_json::from_str::<AnalysisResult>(body) {
                Ok(result) => SubmitOutcome::Analyzed(result),
                Err(e) => SubmitOutcome::Transport(transport_failure(&e)),
            },
            404 => SubmitOutcome::NotFound,
            other => SubmitOutcome::Failed(other),
        }
    }
}

/// Blocking client for the analysis API
pub struct BackendClient {
    client: HttpClient,
    endpoint: String,
}

impl BackendClient {
    pub fn new(config: &UiConfig) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(BackendClient {
            client,
            endpoint: format!("{}/analyze-issue", config.backend_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit an analysis request and wait for the answer
    pub fn analyze(&self, request: &IssueRequest) -> SubmitOutcome {
        debug!("POST {}", self.endpoint);

        let response = match self.client.post(&self.endpoint).json(request).send() {
            Ok(response) => response,
            Err(e) => {
                warn!("Backend request failed: {}", e);
                return SubmitOutcome::Transport(transport_failure(&e));
            }
        };

        let status = response.status().as_u16();
        match response.text() {
            Ok(body) => SubmitOutcome::from_response(status, &body),
            Err(e) => SubmitOutcome::Transport(transport_failure(&e)),
        }
    }
}
