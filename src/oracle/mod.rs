//! Oracle Layer - structured reasoning and decision capabilities
//!
//! This module provides:
//! - Oracle trait for the external structured-output capability
//! - OpperClient HTTP implementation
//! - ReasoningClient and DecisionClient, the two phase wrappers
//! - ScriptedOracle for tests and offline runs

pub mod decision;
pub mod opper;
pub mod reasoning;
pub mod scripted;

pub use decision::DecisionClient;
pub use opper::{OpperClient, OpperConfig};
pub use reasoning::ReasoningClient;
pub use scripted::ScriptedOracle;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ValidationError;

/// Stateless structured-output capability - each call is independent
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Run one named call and return its structured result
    async fn call(&self, call: OracleCall) -> Result<Value, OracleError>;
}

/// Everything needed for one oracle call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleCall {
    /// Call name, used by the backend for grouping and tracing
    pub name: String,
    /// Static phase instructions
    pub instructions: String,
    /// Structured input payload
    pub input: Value,
    /// JSON schema the result must satisfy
    pub output_schema: Value,
}

/// Errors that can occur during oracle operations
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Oracle call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Missing API key: environment variable {env_var} not set")]
    MissingApiKey { env_var: String },
}

/// Issue a call, bounded by an optional deadline
pub(crate) async fn call_with_timeout<O>(
    oracle: &O,
    call: OracleCall,
    timeout: Option<Duration>,
) -> Result<Value, OracleError>
where
    O: Oracle + ?Sized,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, oracle.call(call))
            .await
            .map_err(|_| OracleError::Timeout(limit))?,
        None => oracle.call(call).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct SlowOracle(Duration);

    #[async_trait]
    impl Oracle for SlowOracle {
        async fn call(&self, _call: OracleCall) -> Result<Value, OracleError> {
            tokio::time::sleep(self.0).await;
            Ok(json!({}))
        }
    }

    fn call() -> OracleCall {
        OracleCall {
            name: "agent_reasoning".to_string(),
            instructions: String::new(),
            input: json!({}),
            output_schema: json!({}),
        }
    }

    #[tokio::test]
    async fn test_call_with_timeout_elapses() {
        let result = call_with_timeout(&SlowOracle(Duration::from_secs(5)), call(), Some(Duration::from_millis(10))).await;
        assert!(matches!(result, Err(OracleError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_call_without_timeout_waits() {
        let result = call_with_timeout(&SlowOracle(Duration::from_millis(20)), call(), None).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_validation_error_display() {
        let err = OracleError::from(ValidationError::new("confidence 1.5 is outside [0.0, 1.0]"));
        assert_eq!(
            err.to_string(),
            "Schema validation failed: confidence 1.5 is outside [0.0, 1.0]"
        );
    }
}
