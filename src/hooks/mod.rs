//! Observability hooks invoked by the loop controller
//!
//! Hooks observe a run at fixed points (run start, step start, metric, step
//! end, run end). They are best-effort: the controller logs and ignores any
//! hook error, so a hook can never change the outcome of a run.

mod console;
mod jsonl;
mod recording;

pub use console::ConsoleHook;
pub use jsonl::JsonlTraceHook;
pub use recording::{HookEvent, RecordingHook};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ReasoningResult, RunResult, RunState};

/// Name of the per-step reasoning confidence metric
pub const REASONING_CONFIDENCE: &str = "reasoning_confidence";

/// Errors raised by a hook sink
#[derive(Debug, Error)]
pub enum HookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Sink(String),
}

/// What a run was started with
#[derive(Debug, Clone, Serialize)]
pub struct RunStart {
    pub agent_id: String,
    pub agent_instructions: String,
    pub input_data: Value,
}

/// A named numeric observation for one step
#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
    pub comment: String,
}

impl Metric {
    /// The reasoning confidence metric for a step
    pub fn reasoning_confidence(step: u32, reasoning: &ReasoningResult) -> Self {
        Self {
            name: REASONING_CONFIDENCE.to_string(),
            value: reasoning.confidence,
            comment: format!("Agent's confidence in its reasoning for step {}", step),
        }
    }
}

/// What one completed cycle produced
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub reasoning: ReasoningResult,
    pub action: Value,
    /// Tool result, or the final output on a finishing step
    pub output: Option<Value>,
}

/// Side-channel observer of a run. Every method defaults to a no-op.
#[async_trait]
pub trait RunHook: Send + Sync {
    async fn on_run_start(&self, _run: &RunStart) -> Result<(), HookError> {
        Ok(())
    }

    async fn on_step_start(&self, _step: u32, _state: &RunState) -> Result<(), HookError> {
        Ok(())
    }

    async fn on_metric(&self, _step: u32, _metric: &Metric) -> Result<(), HookError> {
        Ok(())
    }

    async fn on_step_end(&self, _step: u32, _record: &StepRecord) -> Result<(), HookError> {
        Ok(())
    }

    async fn on_run_end(&self, _result: &RunResult) -> Result<(), HookError> {
        Ok(())
    }
}

/// Hook that records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl RunHook for NoopHook {}

/// Fans every event out to several hooks.
///
/// All hooks see every event; the first error is reported after the rest
/// have run.
#[derive(Clone, Default)]
pub struct HookSet {
    hooks: Vec<Arc<dyn RunHook>>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hook: Arc<dyn RunHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

fn first_error(results: Vec<Result<(), HookError>>) -> Result<(), HookError> {
    results.into_iter().collect()
}

#[async_trait]
impl RunHook for HookSet {
    async fn on_run_start(&self, run: &RunStart) -> Result<(), HookError> {
        let mut results = Vec::with_capacity(self.hooks.len());
        for hook in &self.hooks {
            results.push(hook.on_run_start(run).await);
        }
        first_error(results)
    }

    async fn on_step_start(&self, step: u32, state: &RunState) -> Result<(), HookError> {
        let mut results = Vec::with_capacity(self.hooks.len());
        for hook in &self.hooks {
            results.push(hook.on_step_start(step, state).await);
        }
        first_error(results)
    }

    async fn on_metric(&self, step: u32, metric: &Metric) -> Result<(), HookError> {
        let mut results = Vec::with_capacity(self.hooks.len());
        for hook in &self.hooks {
            results.push(hook.on_metric(step, metric).await);
        }
        first_error(results)
    }

    async fn on_step_end(&self, step: u32, record: &StepRecord) -> Result<(), HookError> {
        let mut results = Vec::with_capacity(self.hooks.len());
        for hook in &self.hooks {
            results.push(hook.on_step_end(step, record).await);
        }
        first_error(results)
    }

    async fn on_run_end(&self, result: &RunResult) -> Result<(), HookError> {
        let mut results = Vec::with_capacity(self.hooks.len());
        for hook in &self.hooks {
            results.push(hook.on_run_end(result).await);
        }
        first_error(results)
    }
}
