//! Agent configuration.

use serde::{Deserialize, Serialize};

/// Read-only configuration for one agent run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Task-specific instructions handed to both oracle phases
    pub instructions: String,
    /// Log per-step reasoning, actions and observations at info level
    pub verbose: bool,
}

impl AgentConfig {
    /// Create a new agent config with the given instructions
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            verbose: false,
        }
    }

    /// Set the verbosity flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
