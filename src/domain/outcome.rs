//! Run result types.
//!
//! A run always returns exactly one RunResult: the finish output on
//! success, or a single-field ErrorResult on any terminal failure. Callers
//! tell them apart by the presence of the `error` field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::AgentError;

/// Final review produced by the PR-review agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalOutput {
    pub review_summary: String,
    #[serde(default)]
    pub issues_found: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub overall_assessment: String,
}

impl FinalOutput {
    /// JSON schema advertised to the decision oracle for the finish output
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "review_summary": {"type": "string", "description": "Summary of the PR changes"},
                "issues_found": {"type": "array", "items": {"type": "string"}, "description": "List of issues found"},
                "suggestions": {"type": "array", "items": {"type": "string"}, "description": "List of suggestions"},
                "overall_assessment": {"type": "string", "description": "Overall assessment of the PR"}
            },
            "required": ["review_summary", "overall_assessment"]
        })
    }

    /// Read a finish output leniently, defaulting absent fields
    pub fn from_map(output: &Map<String, Value>) -> Self {
        let text = |key: &str| output.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
        let list = |key: &str| {
            output
                .get(key)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|item| item.as_str().map(String::from).unwrap_or_else(|| item.to_string()))
                        .collect()
                })
                .unwrap_or_default()
        };

        Self {
            review_summary: text("review_summary"),
            issues_found: list("issues_found"),
            suggestions: list("suggestions"),
            overall_assessment: text("overall_assessment"),
        }
    }
}

/// Single-field payload returned in place of a final output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

impl ErrorResult {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// The structured result of one agent run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RunResult {
    Finished(Map<String, Value>),
    Failed(ErrorResult),
}

impl RunResult {
    pub fn is_error(&self) -> bool {
        matches!(self, RunResult::Failed(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RunResult::Failed(e) => Some(&e.error),
            RunResult::Finished(_) => None,
        }
    }

    pub fn output(&self) -> Option<&Map<String, Value>> {
        match self {
            RunResult::Finished(output) => Some(output),
            RunResult::Failed(_) => None,
        }
    }

    /// The plain mapping handed back across the process boundary
    pub fn to_value(&self) -> Value {
        match self {
            RunResult::Finished(output) => Value::Object(output.clone()),
            RunResult::Failed(e) => json!({ "error": e.error }),
        }
    }
}

impl From<AgentError> for RunResult {
    fn from(err: AgentError) -> Self {
        RunResult::Failed(ErrorResult::new(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_output_from_map() {
        let output = json!({
            "review_summary": "Adds caching",
            "issues_found": ["no tests"],
            "overall_assessment": "needs work"
        });
        let review = FinalOutput::from_map(output.as_object().unwrap());
        assert_eq!(review.review_summary, "Adds caching");
        assert_eq!(review.issues_found, vec!["no tests".to_string()]);
        assert!(review.suggestions.is_empty());
        assert_eq!(review.overall_assessment, "needs work");
    }

    #[test]
    fn test_final_output_from_empty_map() {
        let review = FinalOutput::from_map(&Map::new());
        assert_eq!(review, FinalOutput::default());
    }

    #[test]
    fn test_final_output_schema_requires_summary_and_assessment() {
        let schema = FinalOutput::schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("review_summary")));
        assert!(required.contains(&json!("overall_assessment")));
    }

    #[test]
    fn test_run_result_from_error() {
        let result = RunResult::from(AgentError::StepBudgetExceeded(3));
        assert!(result.is_error());
        assert_eq!(result.error_message(), Some("Reached maximum number of steps (3)"));
        assert!(result.output().is_none());
        assert_eq!(result.to_value(), json!({"error": "Reached maximum number of steps (3)"}));
    }

    #[test]
    fn test_run_result_finished_has_no_error_field() {
        let mut output = Map::new();
        output.insert("review_summary".to_string(), json!("ok"));
        let result = RunResult::Finished(output);

        assert!(!result.is_error());
        assert!(result.to_value().get("error").is_none());
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"review_summary": "ok"}));
    }
}
