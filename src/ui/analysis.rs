use serde_json::{Map, Value};

/// Shown for any field the model left out
pub const NOT_AVAILABLE: &str = "N/A";

/// Structured fields of a model answer, for display only
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub summary: Option<String>,
    pub issue_type: Option<String>,
    pub priority: Option<String>,
    pub impact: Option<String>,
    pub labels: Vec<String>,
}

/// Outcome of the best-effort parse of the raw `analysis` text
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedAnalysis {
    Structured(AnalysisView),
    /// Valid JSON object without any fields
    Empty,
    /// Not a JSON object at all
    Unparseable,
}

impl ParsedAnalysis {
    pub fn parse(text: &str) -> Self {
        let object = match serde_json::from_str::<Value>(strip_code_fence(text)) {
            Ok(Value::Object(object)) => object,
            _ => return ParsedAnalysis::Unparseable,
        };

        if object.is_empty() {
            return ParsedAnalysis::Empty;
        }

        ParsedAnalysis::Structured(AnalysisView {
            summary: display_field(&object, "summary"),
            issue_type: display_field(&object, "type"),
            priority: display_field(&object, "priority_score"),
            impact: display_field(&object, "potential_impact"),
            labels: labels(&object),
        })
    }
}

impl AnalysisView {
    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn issue_type(&self) -> &str {
        self.issue_type.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn priority(&self) -> &str {
        self.priority.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn impact(&self) -> &str {
        self.impact.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// Models often wrap JSON in a ```json fence
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn display_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn labels(object: &Map<String, Value>) -> Vec<String> {
    match object.get("suggested_labels") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::String(_) | Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_analysis;

    #[test]
    fn test_parse_full_answer() {
        let parsed = ParsedAnalysis::parse(&sample_analysis("bug"));

        let ParsedAnalysis::Structured(view) = parsed else {
            panic!("expected structured analysis");
        };
        assert_eq!(view.issue_type(), "bug");
        assert_eq!(view.priority(), "4 - crashes for every new user");
        assert_eq!(view.labels, vec!["bug", "good first issue"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let ParsedAnalysis::Structured(view) =
            ParsedAnalysis::parse(r#"{"summary": "Short", "priority_score": 3}"#)
        else {
            panic!("expected structured analysis");
        };

        assert_eq!(view.summary(), "Short");
        assert_eq!(view.priority(), "3");
        assert_eq!(view.issue_type(), NOT_AVAILABLE);
        assert_eq!(view.impact(), NOT_AVAILABLE);
        assert!(view.labels.is_empty());
    }

    #[test]
    fn test_not_json() {
        assert_eq!(ParsedAnalysis::parse("not json"), ParsedAnalysis::Unparseable);
        assert_eq!(ParsedAnalysis::parse(""), ParsedAnalysis::Unparseable);
        assert_eq!(ParsedAnalysis::parse("[1, 2]"), ParsedAnalysis::Unparseable);
        assert_eq!(ParsedAnalysis::parse("42"), ParsedAnalysis::Unparseable);
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(ParsedAnalysis::parse("{}"), ParsedAnalysis::Empty);
    }

    #[test]
    fn test_fenced_json() {
        let text = format!("```json\n{}\n```", sample_analysis("question"));

        let ParsedAnalysis::Structured(view) = ParsedAnalysis::parse(&text) else {
            panic!("expected structured analysis");
        };
        assert_eq!(view.issue_type(), "question");
    }

    #[test]
    fn test_labels_skip_blank_entries() {
        let ParsedAnalysis::Structured(view) =
            ParsedAnalysis::parse(r#"{"suggested_labels": ["ui", "", null, "a11y"]}"#)
        else {
            panic!("expected structured analysis");
        };
        assert_eq!(view.labels, vec!["ui", "a11y"]);
    }
}
