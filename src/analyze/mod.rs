use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{Config, Credentials};
use crate::error::AnalysisError;
use crate::github::{parse_repo_url, GitHubClient};
use crate::llm::prompts::analysis_prompt;
use crate::llm::LlmClient;

/// Body of an analysis request
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct IssueRequest {
    pub repo_url: String,
    pub issue_number: u64,
}

/// Result returned to callers; `analysis` is the model's raw text
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AnalysisResult {
    pub repo: String,
    pub issue_number: u64,
    pub analysis: String,
}

/// Orchestrates the analysis of a single GitHub issue
pub struct IssueAnalyzer {
    github_client: GitHubClient,
    llm_client: LlmClient,
}

impl IssueAnalyzer {
    pub fn new(github_client: GitHubClient, llm_client: LlmClient) -> Self {
        IssueAnalyzer {
            github_client,
            llm_client,
        }
    }

    /// Build real clients from configuration and credentials
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self> {
        let github_client = GitHubClient::new(&config.github, credentials.github_token.clone())?;
        let llm_client = LlmClient::new(&config.llm, credentials.llm_api_key.clone())?;
        Ok(IssueAnalyzer::new(github_client, llm_client))
    }

    /// Fetch the issue and its comments, then ask the model for a triage summary.
    ///
    /// Failing to fetch the issue aborts the analysis; failing to fetch the
    /// comments only drops them from the prompt.
    pub async fn analyze(&self, request: &IssueRequest) -> Result<AnalysisResult, AnalysisError> {
        if request.issue_number == 0 {
            return Err(AnalysisError::InvalidRequest(
                "issue_number must be a positive integer".to_string(),
            ));
        }

        let reference = parse_repo_url(&request.repo_url)?;
        let number = request.issue_number;

        info!("Fetching issue {}", reference.display_issue(number));
        let issue = self
            .github_client
            .fetch_issue(&reference.owner, &reference.repo, number)
            .await?;

        let comments = match self
            .github_client
            .fetch_comments(&reference.owner, &reference.repo, number)
            .await
        {
            Ok(comments) => comments,
            Err(e) => {
                warn!(
                    "Failed to fetch comments for {}: {}",
                    reference.display_issue(number),
                    e
                );
                vec![]
            }
        };
        info!("Fetched issue with {} comments", comments.len());

        let bodies: Vec<String> = comments.into_iter().map(|c| c.body).collect();
        let prompt = analysis_prompt(&issue.title, issue.body.as_deref(), &bodies);

        info!("Requesting analysis from LLM");
        let analysis = self.llm_client.complete(prompt).await?;

        Ok(AnalysisResult {
            repo: request.repo_url.clone(),
            issue_number: number,
            analysis,
        })
    }
}
