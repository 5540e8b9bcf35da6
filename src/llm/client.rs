use anyhow::{Context, Result};
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::AnalysisError;
use crate::llm::{estimate_tokens, ChatRequest, ChatResponse, ErrorResponse, Message};

/// LLM client abstraction
pub enum LlmClient {
    Real(RealLlm),
    #[cfg(test)]
    Mock(MockLlm),
}

impl LlmClient {
    /// Create a new real LLM client
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        Ok(LlmClient::Real(RealLlm::new(config, api_key)?))
    }

    /// Send a single-message completion and return the raw text
    pub async fn complete(&self, prompt: String) -> Result<String, AnalysisError> {
        match self {
            LlmClient::Real(client) => client.complete(prompt).await,
            #[cfg(test)]
            LlmClient::Mock(client) => client.complete(prompt),
        }
    }
}

/// Real client for an OpenAI-compatible chat completions API
pub struct RealLlm {
    client: HttpClient,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
}

impl RealLlm {
    /// Create a new real LLM client
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AnalysisError::Configuration("LLM API key is empty".to_string()).into());
        }

        if !api_key.starts_with("gsk_") && config.api_url.contains("groq.com") {
            warn!("GROQ_API_KEY doesn't start with 'gsk_' - this may not be a valid Groq API key");
        }

        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(RealLlm {
            client,
            api_key,
            endpoint: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Send a completion request
    pub async fn complete(&self, prompt: String) -> Result<String, AnalysisError> {
        debug!(
            "Sending ~{} prompt tokens to {} ({})",
            estimate_tokens(&prompt),
            self.endpoint,
            self.model
        );

        let request = ChatRequest::new(self.model.clone(), vec![Message::user(prompt)])
            .with_temperature(self.temperature);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::from_transport("LLM", self.timeout_secs, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::from_transport("LLM", self.timeout_secs, e))?;

        if !status.is_success() {
            // Try to parse error response
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(error_response) => error_response.error.message,
                Err(_) => body,
            };
            return Err(AnalysisError::Upstream(format!(
                "LLM API error ({}): {}",
                status, message
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::UpstreamMalformed(format!("LLM response: {}", e)))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "LLM usage: {} prompt tokens, {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| AnalysisError::UpstreamMalformed("LLM response has no choices".into()))
    }
}

/// Mock LLM client for testing
#[cfg(test)]
pub struct MockLlm {
    pub responses: Vec<Result<String, String>>,
    pub prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockLlm {
    pub fn new() -> Self {
        MockLlm {
            responses: vec![],
            prompts: std::sync::Mutex::new(vec![]),
        }
    }

    pub fn with_response(mut self, response: &str) -> Self {
        self.responses.push(Ok(response.to_string()));
        self
    }

    pub fn with_timeout(mut self, message: &str) -> Self {
        self.responses.push(Err(message.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn complete(&self, prompt: String) -> Result<String, AnalysisError> {
        let mut prompts = self.prompts.lock().unwrap();
        let index = prompts.len();
        prompts.push(prompt);

        match self.responses.get(index) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(AnalysisError::UpstreamTimeout(message.clone())),
            None => Err(AnalysisError::Upstream(format!(
                "No mock response configured for call {}",
                index
            ))),
        }
    }
}
