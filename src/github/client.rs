use crate::config::GitHubConfig;
use crate::error::AnalysisError;
use crate::github::models::*;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// GitHub client abstraction
pub enum GitHubClient {
    Real(RealGitHub),
    #[cfg(test)]
    Mock(MockGitHub),
}

impl GitHubClient {
    /// Create a new real GitHub client
    pub fn new(config: &GitHubConfig, token: Option<String>) -> Result<Self> {
        Ok(GitHubClient::Real(RealGitHub::new(config, token)?))
    }

    /// Create a mock client for testing
    #[cfg(test)]
    pub fn mock() -> Self {
        GitHubClient::Mock(MockGitHub::new())
    }

    /// Fetch a single issue. Any non-200 answer is `IssueNotFound`.
    pub async fn fetch_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Issue, AnalysisError> {
        match self {
            GitHubClient::Real(client) => client.fetch_issue(owner, repo, number).await,
            #[cfg(test)]
            GitHubClient::Mock(client) => client.fetch_issue(owner, repo, number),
        }
    }

    /// Fetch the comments of an issue. A non-200 answer yields no comments.
    pub async fn fetch_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Comment>, AnalysisError> {
        match self {
            GitHubClient::Real(client) => client.fetch_comments(owner, repo, number).await,
            #[cfg(test)]
            GitHubClient::Mock(client) => client.fetch_comments(owner, repo, number),
        }
    }
}

/// Real GitHub client over the REST API
pub struct RealGitHub {
    client: HttpClient,
    api_url: String,
    timeout_secs: u64,
}

impl RealGitHub {
    /// Create a new real GitHub client
    pub fn new(config: &GitHubConfig, token: Option<String>) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(build_headers(token.as_deref())?)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(RealGitHub {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn issue_url(&self, owner: &str, repo: &str, number: u64) -> String {
        format!("{}/repos/{}/{}/issues/{}", self.api_url, owner, repo, number)
    }

    pub async fn fetch_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Issue, AnalysisError> {
        let url = self.issue_url(owner, repo, number);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::from_transport("GitHub", self.timeout_secs, e))?;

        if response.status() != StatusCode::OK {
            warn!(
                "GitHub returned {} for issue {}/{}#{}",
                response.status(),
                owner,
                repo,
                number
            );
            return Err(AnalysisError::IssueNotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                number,
            });
        }

        response
            .json::<Issue>()
            .await
            .map_err(|e| AnalysisError::UpstreamMalformed(format!("GitHub issue: {}", e)))
    }

    pub async fn fetch_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Comment>, AnalysisError> {
        let url = format!("{}/comments", self.issue_url(owner, repo, number));
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::from_transport("GitHub", self.timeout_secs, e))?;

        if response.status() != StatusCode::OK {
            warn!(
                "GitHub returned {} for comments of {}/{}#{}, continuing without comments",
                response.status(),
                owner,
                repo,
                number
            );
            return Ok(vec![]);
        }

        response
            .json::<Vec<Comment>>()
            .await
            .map_err(|e| AnalysisError::UpstreamMalformed(format!("GitHub comments: {}", e)))
    }
}

/// Build default request headers; the bearer token is only sent when present
fn build_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("gh-issue-assistant/", env!("CARGO_PKG_VERSION"))),
    );

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("Invalid GitHub token format")?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Mock GitHub client for testing
#[cfg(test)]
pub struct MockGitHub {
    pub issues: Vec<(u64, Issue)>,
    pub comments: Vec<Comment>,
    pub comments_error: Option<String>,
}

#[cfg(test)]
impl MockGitHub {
    pub fn new() -> Self {
        MockGitHub {
            issues: vec![],
            comments: vec![],
            comments_error: None,
        }
    }

    pub fn with_issue(mut self, number: u64, issue: Issue) -> Self {
        self.issues.push((number, issue));
        self
    }

    pub fn with_comments(mut self, bodies: &[&str]) -> Self {
        self.comments = bodies
            .iter()
            .map(|body| Comment {
                body: body.to_string(),
            })
            .collect();
        self
    }

    pub fn fetch_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Issue, AnalysisError> {
        self.issues
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, issue)| issue.clone())
            .ok_or_else(|| AnalysisError::IssueNotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                number,
            })
    }

    pub fn fetch_comments(
        &self,
        _owner: &str,
        _repo: &str,
        _number: u64,
    ) -> Result<Vec<Comment>, AnalysisError> {
        match &self.comments_error {
            Some(message) => Err(AnalysisError::Upstream(message.clone())),
            None => Ok(self.comments.clone()),
        }
    }
}
