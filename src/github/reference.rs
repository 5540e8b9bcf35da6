use crate::error::AnalysisError;

/// Repository coordinates parsed from a user-supplied URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository owner (e.g., "octocat")
    pub owner: String,
    /// Repository name (e.g., "Hello-World")
    pub repo: String,
}

impl RepoRef {
    /// Get the full repository name (owner/repo)
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Get a short display representation of one of its issues
    pub fn display_issue(&self, number: u64) -> String {
        format!("{}#{}", self.full_name(), number)
    }
}

/// Parse a repository URL into owner and repo.
///
/// Takes the last two `/`-separated segments after trailing slashes are
/// stripped, so `https://github.com/owner/repo`, `https://github.com/owner/repo/`
/// and `owner/repo` all resolve to the same pair.
pub fn parse_repo_url(input: &str) -> Result<RepoRef, AnalysisError> {
    let trimmed = input.trim().trim_end_matches('/');

    let mut segments = trimmed.rsplit('/');
    let (repo, owner) = match (segments.next(), segments.next()) {
        (Some(repo), Some(owner)) => (repo, owner),
        _ => {
            return Err(AnalysisError::InvalidRepoUrl(format!(
                "expected a URL ending in owner/repo, got {:?}",
                input
            )))
        }
    };

    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if owner.is_empty() || repo.is_empty() {
        return Err(AnalysisError::InvalidRepoUrl(format!(
            "empty owner or repository in {:?}",
            input
        )));
    }

    // GitHub logins never contain '.' or ':', so this is a host or scheme
    if owner.contains('.') || owner.contains(':') {
        return Err(AnalysisError::InvalidRepoUrl(format!(
            "missing owner or repository in {:?}",
            input
        )));
    }

    // Names end up in the request path, so only GitHub's name alphabet is allowed
    if !owner.chars().all(is_name_char)
        || !repo.chars().all(is_name_char)
        || repo == "."
        || repo == ".."
    {
        return Err(AnalysisError::InvalidRepoUrl(format!(
            "unexpected characters in owner or repository of {:?}",
            input
        )));
    }

    Ok(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}
