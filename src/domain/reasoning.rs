//! Reasoning phase output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ValidationError;

/// Free-text analysis plus a calibrated confidence score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningResult {
    pub content: String,
    pub confidence: f64,
}

impl ReasoningResult {
    /// Decode and validate a structured oracle response.
    ///
    /// Confidence outside `[0.0, 1.0]` is rejected, never clamped.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let result: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::new(format!("invalid reasoning result: {}", e)))?;
        result.validate()?;
        Ok(result)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::new("reasoning content is empty"));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ValidationError::new(format!(
                "confidence {} is outside [0.0, 1.0]",
                self.confidence
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_reasoning() {
        let result = ReasoningResult::from_value(json!({
            "content": "Fetch the PR first",
            "confidence": 0.4
        }))
        .unwrap();
        assert_eq!(result.content, "Fetch the PR first");
        assert_eq!(result.confidence, 0.4);
    }

    #[test]
    fn test_confidence_bounds_are_inclusive() {
        assert!(ReasoningResult::from_value(json!({"content": "a", "confidence": 0.0})).is_ok());
        assert!(ReasoningResult::from_value(json!({"content": "a", "confidence": 1.0})).is_ok());
    }

    #[test]
    fn test_confidence_above_one_rejected() {
        let err = ReasoningResult::from_value(json!({"content": "a", "confidence": 1.5})).unwrap_err();
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_negative_confidence_rejected() {
        assert!(ReasoningResult::from_value(json!({"content": "a", "confidence": -0.1})).is_err());
    }

    #[test]
    fn test_nan_confidence_rejected() {
        let result = ReasoningResult {
            content: "a".to_string(),
            confidence: f64::NAN,
        };
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_missing_content_rejected() {
        let err = ReasoningResult::from_value(json!({"confidence": 0.5})).unwrap_err();
        assert!(err.to_string().contains("invalid reasoning result"));
    }

    #[test]
    fn test_blank_content_rejected() {
        assert!(ReasoningResult::from_value(json!({"content": "  ", "confidence": 0.5})).is_err());
    }
}
