use std::fmt;

/// Failure kinds of an issue analysis.
///
/// Each variant maps to one HTTP status so callers can tell a missing issue
/// apart from an upstream outage.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A required secret or setting is missing
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request itself is unusable (e.g. issue number 0)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The repository URL does not end in `owner/repo`
    #[error("invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    /// GitHub answered the issue lookup with a non-200 status
    #[error("GitHub issue not found")]
    IssueNotFound {
        owner: String,
        repo: String,
        number: u64,
    },

    /// Transport or API failure talking to GitHub or the LLM
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    UpstreamTimeout(String),

    /// An upstream answered 2xx with a body we could not use
    #[error("malformed upstream response: {0}")]
    UpstreamMalformed(String),
}

impl AnalysisError {
    /// HTTP status code this failure is surfaced as
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::InvalidRequest(_) => 422,
            AnalysisError::InvalidRepoUrl(_) => 400,
            AnalysisError::IssueNotFound { .. } => 404,
            AnalysisError::Configuration(_)
            | AnalysisError::Upstream(_)
            | AnalysisError::UpstreamTimeout(_)
            | AnalysisError::UpstreamMalformed(_) => 500,
        }
    }

    /// Build an upstream error from a reqwest failure, keeping timeouts apart
    pub(crate) fn from_transport(service: &str, timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::UpstreamTimeout(format!(
                "{} request timed out after {}s",
                service, timeout_secs
            ))
        } else {
            AnalysisError::Upstream(format!("{} request failed: {}", service, err))
        }
    }
}

/// User-friendly error wrapper
#[derive(Debug, Clone, PartialEq)]
pub struct UserError {
    message: String,
    details: Option<String>,
    suggestion: Option<String>,
}

impl UserError {
    /// Create a new user error
    pub fn new(message: impl Into<String>) -> Self {
        UserError {
            message: message.into(),
            details: None,
            suggestion: None,
        }
    }

    /// Add details about the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a suggestion for how to fix the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Format the error for display on stderr
    pub fn display(&self) {
        eprintln!("\n❌ Error: {}", self.message);

        if let Some(ref details) = self.details {
            eprintln!("\n   {}", details);
        }

        if let Some(ref suggestion) = self.suggestion {
            eprintln!("\n💡 {}", suggestion);
        }
    }
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref details) = self.details {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for UserError {}

/// Message shown when the backend could not find the issue
pub fn issue_not_found() -> UserError {
    UserError::new("Issue number not found in this repository.")
        .with_suggestion("Please verify the issue number and try again.")
}

/// Message shown for any other non-200 backend answer
pub fn backend_failure(status: u16) -> UserError {
    UserError::new("Something went wrong while processing your request.")
        .with_details(format!("backend returned HTTP {}", status))
        .with_suggestion("Please try again later.")
}

/// Message shown when the backend could not be reached at all
pub fn transport_failure(error: &dyn std::error::Error) -> UserError {
    UserError::new(format!("Request failed: {}", error))
}

/// Convert process-level errors to user-friendly messages
pub fn user_friendly_error(error: &anyhow::Error) -> UserError {
    let error_str = format!("{:#}", error);

    if error_str.contains("Failed to parse config") {
        return UserError::new("Invalid configuration file")
            .with_details("The configuration file contains syntax errors")
            .with_suggestion("Check the TOML syntax of your config.toml");
    }

    if error_str.contains("Failed to read config") {
        return UserError::new("Configuration file not found")
            .with_suggestion("Check the path passed to --config");
    }

    if error_str.contains("Failed to bind") {
        return UserError::new("Could not start the server")
            .with_details(format!("{:#}", error))
            .with_suggestion("Pick a free address with --bind");
    }

    if let Some(analysis_error) = error.downcast_ref::<AnalysisError>() {
        if let AnalysisError::Configuration(message) = analysis_error {
            return UserError::new("LLM API key not configured")
                .with_details(message.clone())
                .with_suggestion(
                    "Set the GROQ_API_KEY environment variable or add it to a .env file",
                );
        }

        let user_error = UserError::new("Analysis failed").with_details(analysis_error.to_string());
        return match analysis_error {
            AnalysisError::IssueNotFound { owner, repo, number } => user_error.with_suggestion(
                format!("Check that issue #{} exists in {}/{}", number, owner, repo),
            ),
            AnalysisError::InvalidRepoUrl(_) => {
                user_error.with_suggestion("Use a URL such as https://github.com/owner/repo")
            }
            _ => user_error,
        };
    }

    UserError::new("An unexpected error occurred").with_details(format!("{:#}", error))
}
