//! Domain types for react-agent
//!
//! This module contains the data model threaded through one agent run:
//! - AgentConfig: Read-only instructions and verbosity for a run
//! - RunState: Mutable per-run context (input, thoughts, step, results)
//! - ReasoningResult: Output of the reasoning phase
//! - Action: Output of the decision phase (use a tool or finish)
//! - RunResult: The single structured result a run returns

pub mod action;
pub mod agent;
pub mod outcome;
pub mod reasoning;
pub mod state;

pub use action::{Action, ActionWire, CanonicalForm, ParamValue, ToolParams};
pub use agent::AgentConfig;
pub use outcome::{ErrorResult, FinalOutput, RunResult};
pub use reasoning::ReasoningResult;
pub use state::RunState;

use thiserror::Error;

/// A structured oracle response that does not satisfy its schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
