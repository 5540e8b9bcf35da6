//! Test utilities for gh-issue-assistant
#![cfg(test)]

use crate::analyze::AnalysisResult;
use crate::github::Issue;

/// Create a test issue
pub fn create_test_issue(title: &str, body: Option<&str>) -> Issue {
    Issue {
        title: title.to_string(),
        body: body.map(str::to_string),
    }
}

/// A well-formed model answer of the given issue type
pub fn sample_analysis(issue_type: &str) -> String {
    serde_json::json!({
        "summary": "The greeting crashes when the name is empty.",
        "type": issue_type,
        "priority_score": "4 - crashes for every new user",
        "suggested_labels": ["bug", "good first issue"],
        "potential_impact": "New users cannot complete onboarding."
    })
    .to_string()
}

/// An analysis result carrying the given raw model text
pub fn create_test_result(analysis: &str) -> AnalysisResult {
    AnalysisResult {
        repo: "https://github.com/octocat/Hello-World".to_string(),
        issue_number: 1,
        analysis: analysis.to_string(),
    }
}
