//! Error types for react-agent
//!
//! Centralized error handling using thiserror. The Display strings of the
//! terminal variants are the messages callers see in an `ErrorResult`.

use thiserror::Error;

/// All error types that can end an agent run
#[derive(Debug, Error)]
pub enum AgentError {
    /// The reasoning oracle failed or returned an invalid result
    #[error("Reasoning failed at step {step}: {message}")]
    ReasoningValidation { step: u32, message: String },

    /// The decision oracle failed or returned an invalid action
    #[error("Action selection failed at step {step}: {message}")]
    ActionValidation { step: u32, message: String },

    /// The selected tool is not registered
    #[error("Tool '{name}' not found. Available tools: [{}]", available.join(", "))]
    ToolNotFound { name: String, available: Vec<String> },

    /// The tool raised an error while running
    #[error("Error executing tool {name}: {message}")]
    ToolExecution { name: String, message: String },

    /// The loop ran out of steps before finishing
    #[error("Reached maximum number of steps ({0})")]
    StepBudgetExceeded(u32),

    /// An observability hook failed
    #[error("Hook error: {0}")]
    Hook(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for react-agent operations
pub type Result<T> = std::result::Result<T, AgentError>;
