//! Decision phase client.
//!
//! Given the reasoning of the current cycle, asks the oracle to choose
//! between invoking one of the registered tools or finishing the run.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use super::{Oracle, OracleCall, OracleError, call_with_timeout};
use crate::domain::{Action, AgentConfig, FinalOutput, ReasoningResult, RunState};

/// Call name reported to the oracle backend
pub const DECISION_CALL: &str = "agent_action";

/// Static instructions for the action selection phase
pub const DECISION_INSTRUCTIONS: &str = "\
You are in the ACTION SELECTION phase of a ReAct (Reasoning-Acting-Observation) loop.

Based on your prior reasoning, you must now decide on the next action to take.

You have two options, and you must pick exactly one:
1. Use a tool to gather more information or make progress:
   - action_type: \"use_tool\"
   - tool_name: Select one of the names listed in available_tools; no other name is valid
   - tool_params: Provide the necessary parameters for the tool

2. Finish the task if you have enough information:
   - action_type: \"finish\"
   - output: Provide your final review with:
     - review_summary: A concise summary of the PR changes
     - issues_found: A list of issues or concerns
     - suggestions: A list of improvement suggestions
     - overall_assessment: Your final assessment of the PR

Choose your action carefully based on your reasoning and the current context.";

/// Wraps the oracle for the action selection phase
pub struct DecisionClient<O: Oracle + ?Sized> {
    oracle: Arc<O>,
    timeout: Option<Duration>,
}

impl<O: Oracle + ?Sized> DecisionClient<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle, timeout: None }
    }

    /// Bound each decision call
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// JSON schema for the action, restricting tool names to the registry
    pub fn output_schema(available_tools: &[String]) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action_type": {
                    "type": "string",
                    "enum": ["use_tool", "finish"],
                    "description": "Type of action: 'use_tool' or 'finish'"
                },
                "tool_name": {
                    "type": "string",
                    "enum": available_tools,
                    "description": "Name of the tool to use"
                },
                "tool_params": {
                    "type": "object",
                    "description": "Parameters for the tool"
                },
                "output": {
                    "description": "Final output if finishing",
                    "allOf": [FinalOutput::schema()]
                }
            },
            "required": ["action_type"]
        })
    }

    /// Build the call for the current step
    pub fn build_call(
        &self,
        agent: &AgentConfig,
        state: &RunState,
        reasoning: &ReasoningResult,
        available_tools: &[String],
    ) -> OracleCall {
        OracleCall {
            name: DECISION_CALL.to_string(),
            instructions: DECISION_INSTRUCTIONS.to_string(),
            input: json!({
                "reasoning": reasoning.content,
                "reasoning_confidence": reasoning.confidence,
                "context": state.snapshot(),
                "available_tools": available_tools,
                "agent_instructions": agent.instructions,
                "step_number": state.current_step(),
            }),
            output_schema: Self::output_schema(available_tools),
        }
    }

    /// Choose the next action. No retry on failure.
    pub async fn decide(
        &self,
        agent: &AgentConfig,
        state: &RunState,
        reasoning: &ReasoningResult,
        available_tools: &[String],
    ) -> Result<Action, OracleError> {
        let call = self.build_call(agent, state, reasoning, available_tools);
        let value = call_with_timeout(self.oracle.as_ref(), call, self.timeout).await?;
        Ok(Action::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ScriptedOracle;

    fn reasoning() -> ReasoningResult {
        ReasoningResult {
            content: "The PR is fetched, time to review".to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_build_call_lists_available_tools() {
        let client = DecisionClient::new(Arc::new(ScriptedOracle::new()));
        let tools = vec!["github_pr_tool".to_string()];
        let state = RunState::new(json!({}));

        let call = client.build_call(&AgentConfig::new("review"), &state, &reasoning(), &tools);

        assert_eq!(call.name, DECISION_CALL);
        assert_eq!(call.input["available_tools"], json!(["github_pr_tool"]));
        assert_eq!(call.input["reasoning_confidence"], 0.9);
        assert_eq!(call.input["agent_instructions"], "review");
        assert_eq!(
            call.output_schema["properties"]["tool_name"]["enum"],
            json!(["github_pr_tool"])
        );
    }

    #[test]
    fn test_schema_offers_exactly_two_actions() {
        let schema = DecisionClient::<ScriptedOracle>::output_schema(&[]);
        assert_eq!(
            schema["properties"]["action_type"]["enum"],
            json!(["use_tool", "finish"])
        );
    }

    #[tokio::test]
    async fn test_decide_finish() {
        let oracle = Arc::new(ScriptedOracle::new().with_response(
            DECISION_CALL,
            json!({"action_type": "finish", "output": {"review_summary": "ok", "overall_assessment": "good"}}),
        ));
        let client = DecisionClient::new(oracle);

        let action = client
            .decide(&AgentConfig::default(), &RunState::new(json!({})), &reasoning(), &[])
            .await
            .unwrap();

        assert!(matches!(action, Action::Finish { output: Some(_) }));
    }

    #[tokio::test]
    async fn test_decide_rejects_unknown_action() {
        let oracle = Arc::new(ScriptedOracle::new().with_response(DECISION_CALL, json!({"action_type": "ask_user"})));
        let client = DecisionClient::new(oracle);

        let err = client
            .decide(&AgentConfig::default(), &RunState::new(json!({})), &reasoning(), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, OracleError::Validation(_)));
    }
}
