//! Loop controller - drives the Reason-Act-Observe cycle for one run.
//!
//! Each cycle:
//! 1. Advances the step counter and asks the reasoning oracle about the state
//! 2. Asks the decision oracle to use a tool or finish
//! 3. On finish: returns the output (the only success path)
//! 4. On use_tool: checks the registry, normalizes params, invokes the tool
//! 5. Folds the observation back into the state and repeats
//!
//! Every failure is terminal. `run_agent` always returns a RunResult and
//! never an error.

use std::sync::Arc;
use std::time::Duration;

use log::{Level, error, info, log, warn};
use serde_json::{Map, Value};

use crate::domain::state::observation_text;
use crate::domain::{Action, AgentConfig, RunResult, RunState};
use crate::error::{AgentError, Result};
use crate::hooks::{HookError, Metric, NoopHook, RunHook, RunStart, StepRecord};
use crate::oracle::{DecisionClient, Oracle, ReasoningClient};
use crate::tools::{Tool, ToolError, ToolRegistry, normalize_params};

/// Default step budget
pub const DEFAULT_MAX_STEPS: u32 = 15;

/// Configuration for the LoopController.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Maximum number of reason-decide-act cycles per run
    pub max_steps: u32,
    /// Deadline for each oracle call; `None` waits as long as the transport does
    pub oracle_timeout: Option<Duration>,
    /// Deadline for each tool invocation; `None` waits as long as the tool does
    pub tool_timeout: Option<Duration>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            oracle_timeout: None,
            tool_timeout: None,
        }
    }
}

/// Runs agents against an oracle and a tool registry.
///
/// Holds no per-run state, so one controller can serve concurrent runs.
pub struct LoopController<O: Oracle + ?Sized> {
    reasoning: ReasoningClient<O>,
    decision: DecisionClient<O>,
    tools: Arc<ToolRegistry>,
    hook: Arc<dyn RunHook>,
    config: ControllerConfig,
}

impl<O: Oracle + ?Sized> LoopController<O> {
    /// Create a controller with the default configuration
    pub fn new(oracle: Arc<O>) -> Self {
        Self::with_config(oracle, ControllerConfig::default())
    }

    /// Create a controller with a custom configuration
    pub fn with_config(oracle: Arc<O>, config: ControllerConfig) -> Self {
        Self {
            reasoning: ReasoningClient::new(oracle.clone()).with_timeout(config.oracle_timeout),
            decision: DecisionClient::new(oracle).with_timeout(config.oracle_timeout),
            tools: Arc::new(ToolRegistry::new()),
            hook: Arc::new(NoopHook),
            config,
        }
    }

    /// Use an already populated registry
    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Arc::new(tools);
        self
    }

    /// Attach an observability hook
    pub fn with_hook(mut self, hook: Arc<dyn RunHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Replace the registered tools
    pub fn register_tools<I, S>(&mut self, tools: I)
    where
        I: IntoIterator<Item = (S, Arc<dyn Tool>)>,
        S: Into<String>,
    {
        Arc::make_mut(&mut self.tools).register(tools);
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Run an agent to completion.
    ///
    /// Returns the finish output, or an ErrorResult for any terminal failure.
    pub async fn run_agent(&self, agent_id: &str, agent: &AgentConfig, input: Value) -> RunResult {
        let run = RunStart {
            agent_id: agent_id.to_string(),
            agent_instructions: agent.instructions.clone(),
            input_data: input.clone(),
        };
        observe("on_run_start", self.hook.on_run_start(&run).await);

        let mut state = RunState::new(input);
        let result = match self.drive(agent, &mut state).await {
            Ok(output) => {
                info!("Agent {} final output: {}", agent_id, Value::Object(output.clone()));
                RunResult::Finished(output)
            }
            Err(err) => {
                match err {
                    AgentError::StepBudgetExceeded(_) => warn!("Agent {}: {}", agent_id, err),
                    _ => error!("Agent {}: {}", agent_id, err),
                }
                RunResult::from(err)
            }
        };

        observe("on_run_end", self.hook.on_run_end(&result).await);
        result
    }

    async fn drive(&self, agent: &AgentConfig, state: &mut RunState) -> Result<Map<String, Value>> {
        let level = if agent.verbose { Level::Info } else { Level::Debug };

        while state.current_step() < self.config.max_steps {
            let step = state.advance();
            observe("on_step_start", self.hook.on_step_start(step, state).await);

            let reasoning = self
                .reasoning
                .reason(agent, state)
                .await
                .map_err(|e| AgentError::ReasoningValidation {
                    step,
                    message: e.to_string(),
                })?;
            log!(
                level,
                "Step {} reasoning (confidence {:.2}): {}",
                step,
                reasoning.confidence,
                reasoning.content
            );
            observe(
                "on_metric",
                self.hook
                    .on_metric(step, &Metric::reasoning_confidence(step, &reasoning))
                    .await,
            );

            let action = self
                .decision
                .decide(agent, state, &reasoning, self.tools.names())
                .await
                .map_err(|e| AgentError::ActionValidation {
                    step,
                    message: e.to_string(),
                })?;
            let action_record = action.to_record();

            match action {
                Action::Finish { output } => {
                    let output = output.unwrap_or_else(|| {
                        warn!("Step {} finished without an output, using an empty result", step);
                        Map::new()
                    });
                    let record = StepRecord {
                        reasoning,
                        action: action_record,
                        output: Some(Value::Object(output.clone())),
                    };
                    observe("on_step_end", self.hook.on_step_end(step, &record).await);
                    return Ok(output);
                }
                Action::UseTool { tool_name, tool_params } => {
                    if !self.tools.contains(&tool_name) {
                        return Err(AgentError::ToolNotFound {
                            name: tool_name,
                            available: self.tools.names().to_vec(),
                        });
                    }
                    log!(level, "Step {} selected tool {} with {}", step, tool_name, action_record["tool_params"]);

                    let params = normalize_params(&tool_params).map_err(|e| AgentError::ToolExecution {
                        name: tool_name.clone(),
                        message: e.to_string(),
                    })?;
                    let result = self.invoke_tool(&tool_name, params).await?;
                    log!(level, "Step {} observation: {}", step, observation_text(&result));

                    let record = StepRecord {
                        reasoning: reasoning.clone(),
                        action: action_record,
                        output: Some(result.clone()),
                    };
                    observe("on_step_end", self.hook.on_step_end(step, &record).await);

                    state.record_step(reasoning.content, result);
                }
            }
        }

        Err(AgentError::StepBudgetExceeded(self.config.max_steps))
    }

    async fn invoke_tool(&self, name: &str, params: Map<String, Value>) -> Result<Value> {
        match self.config.tool_timeout {
            Some(limit) => tokio::time::timeout(limit, self.tools.invoke(name, params))
                .await
                .map_err(|_| AgentError::ToolExecution {
                    name: name.to_string(),
                    message: ToolError::Timeout(limit).to_string(),
                })?,
            None => self.tools.invoke(name, params).await,
        }
    }
}

/// Log and swallow a hook failure
fn observe(event: &str, result: std::result::Result<(), HookError>) {
    if let Err(e) = result {
        error!("Hook {} failed: {}", event, e);
    }
}
