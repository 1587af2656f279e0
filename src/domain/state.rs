//! Per-run mutable state.
//!
//! A RunState is created at the start of a run, mutated once per cycle by the
//! loop controller and dropped when the run returns. It is serialized in full
//! into every oracle request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Accumulated context for a single agent run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    input: Value,
    thoughts: Vec<String>,
    current_step: u32,
    intermediate_results: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_observation: Option<String>,
}

impl RunState {
    /// Create the state for a new run from its input payload
    pub fn new(input: Value) -> Self {
        Self {
            input,
            thoughts: Vec::new(),
            current_step: 0,
            intermediate_results: BTreeMap::new(),
            last_observation: None,
        }
    }

    /// Key under which a step's tool result is stored
    pub fn step_key(step: u32) -> String {
        format!("step_{}", step)
    }

    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn thoughts(&self) -> &[String] {
        &self.thoughts
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn intermediate_results(&self) -> &BTreeMap<String, Value> {
        &self.intermediate_results
    }

    pub fn last_observation(&self) -> Option<&str> {
        self.last_observation.as_deref()
    }

    /// Start the next cycle, returning its step number
    pub fn advance(&mut self) -> u32 {
        self.current_step += 1;
        self.current_step
    }

    /// Fold a completed tool step back into the state.
    ///
    /// The observation is the stringified result; the raw result is kept
    /// under `step_<n>`.
    pub fn record_step(&mut self, thought: impl Into<String>, result: Value) {
        self.thoughts.push(thought.into());
        self.last_observation = Some(observation_text(&result));
        self.intermediate_results
            .insert(Self::step_key(self.current_step), result);
    }

    /// Serialize the full state for an oracle request or a hook record
    pub fn snapshot(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Render a tool result as observation text.
///
/// Plain strings are taken as-is; everything else is compact JSON.
pub fn observation_text(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_state_is_empty() {
        let state = RunState::new(json!({"owner": "acme"}));
        assert_eq!(state.current_step(), 0);
        assert!(state.thoughts().is_empty());
        assert!(state.intermediate_results().is_empty());
        assert!(state.last_observation().is_none());
        assert_eq!(state.input()["owner"], "acme");
    }

    #[test]
    fn test_advance_increments_by_one() {
        let mut state = RunState::new(json!({}));
        assert_eq!(state.advance(), 1);
        assert_eq!(state.advance(), 2);
        assert_eq!(state.current_step(), 2);
    }

    #[test]
    fn test_record_step() {
        let mut state = RunState::new(json!({}));
        state.advance();
        state.record_step("need PR data", json!({"status": "success"}));

        assert_eq!(state.thoughts(), ["need PR data".to_string()]);
        assert_eq!(state.last_observation(), Some(r#"{"status":"success"}"#));
        assert_eq!(state.intermediate_results()["step_1"]["status"], "success");
    }

    #[test]
    fn test_last_observation_is_overwritten() {
        let mut state = RunState::new(json!({}));
        state.advance();
        state.record_step("first", json!("one"));
        state.advance();
        state.record_step("second", json!("two"));

        assert_eq!(state.last_observation(), Some("two"));
        assert_eq!(state.intermediate_results().len(), 2);
        assert_eq!(state.thoughts().len(), 2);
    }

    #[test]
    fn test_snapshot_shape() {
        let mut state = RunState::new(json!({"pr_number": 7}));
        let snapshot = state.snapshot();
        assert_eq!(snapshot["current_step"], 0);
        assert!(snapshot.get("last_observation").is_none());

        state.advance();
        state.record_step("t", json!(1));
        let snapshot = state.snapshot();
        assert_eq!(snapshot["input"]["pr_number"], 7);
        assert_eq!(snapshot["last_observation"], "1");
        assert_eq!(snapshot["intermediate_results"]["step_1"], 1);
    }
}
