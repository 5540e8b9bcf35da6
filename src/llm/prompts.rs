/// Maximum number of comments included in a prompt
pub const MAX_PROMPT_COMMENTS: usize = 5;

/// Issue types the model is asked to choose from
pub const ISSUE_TYPES: [&str; 5] = ["bug", "feature_request", "documentation", "question", "other"];

/// Placeholder used when an issue has no comments
pub const NO_COMMENTS: &str = "No comments available";

/// Placeholder used when an issue has no description
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Generate the triage prompt for a single issue.
///
/// Only the first [`MAX_PROMPT_COMMENTS`] comments are included, in their
/// original order. Title and body are embedded as-is.
pub fn analysis_prompt(title: &str, body: Option<&str>, comments: &[String]) -> String {
    let comments_text = comments
        .iter()
        .take(MAX_PROMPT_COMMENTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    let comments_section = if comments_text.trim().is_empty() {
        NO_COMMENTS
    } else {
        comments_text.as_str()
    };

    format!(
        r#"You are an AI assistant that analyzes GitHub issues.

Return ONLY valid JSON exactly in this format:

{{
  "summary": "One sentence summary",
  "type": "{}",
  "priority_score": "1-5 with short justification",
  "suggested_labels": ["label1", "label2"],
  "potential_impact": "Short sentence"
}}

GitHub Issue Title:
{}

GitHub Issue Description:
{}

GitHub Comments:
{}
"#,
        ISSUE_TYPES.join(" | "),
        title,
        body.unwrap_or(NO_DESCRIPTION),
        comments_section
    )
}
