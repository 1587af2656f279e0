//! Reasoning phase client.
//!
//! Asks the oracle to reflect on the accumulated run state and return
//! free-text analysis plus a calibrated confidence score.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use super::{Oracle, OracleCall, OracleError, call_with_timeout};
use crate::domain::{AgentConfig, ReasoningResult, RunState};

/// Call name reported to the oracle backend
pub const REASONING_CALL: &str = "agent_reasoning";

/// Static instructions for the reasoning phase
pub const REASONING_INSTRUCTIONS: &str = "\
You are in the REASONING phase of a ReAct (Reasoning-Acting-Observation) loop.

In this phase, you should:
1. Analyze the current state and context
2. Think step-by-step about what you know and what you need to find out
3. Consider what tools or actions might be helpful
4. Determine your next steps

Your reasoning should be thorough, logical, and clear. It will be used to decide
what action to take next in the ReAct loop.

Additionally, you should provide a confidence score from 0.0 to 1.0 indicating how
confident you are in your reasoning:
- 0.0-0.3: Low confidence - you have very limited information and high uncertainty
- 0.4-0.7: Medium confidence - you have some information but still have uncertainties
- 0.8-1.0: High confidence - you have sufficient information to make a well-informed decision

This confidence score helps track the quality of the decision-making process.";

/// Wraps the oracle for the reasoning phase
pub struct ReasoningClient<O: Oracle + ?Sized> {
    oracle: Arc<O>,
    timeout: Option<Duration>,
}

impl<O: Oracle + ?Sized> ReasoningClient<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle, timeout: None }
    }

    /// Bound each reasoning call
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// JSON schema for the reasoning result
    pub fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The agent's reasoning about the current state"
                },
                "confidence": {
                    "type": "number",
                    "minimum": 0.0,
                    "maximum": 1.0,
                    "description": "A score from 0.0 to 1.0 indicating your confidence in the reasoning"
                }
            },
            "required": ["content", "confidence"]
        })
    }

    /// Build the call for the current step
    pub fn build_call(&self, agent: &AgentConfig, state: &RunState) -> OracleCall {
        OracleCall {
            name: REASONING_CALL.to_string(),
            instructions: REASONING_INSTRUCTIONS.to_string(),
            input: json!({
                "agent_instructions": agent.instructions,
                "context": state.snapshot(),
                "step_number": state.current_step(),
                "last_observation": state.last_observation(),
            }),
            output_schema: Self::output_schema(),
        }
    }

    /// Reason about the current state. No retry on failure.
    pub async fn reason(&self, agent: &AgentConfig, state: &RunState) -> Result<ReasoningResult, OracleError> {
        let call = self.build_call(agent, state);
        let value = call_with_timeout(self.oracle.as_ref(), call, self.timeout).await?;
        Ok(ReasoningResult::from_value(value)?)
    }
}
