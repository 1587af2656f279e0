//! In-memory hook used to inspect what a run reported.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::{HookError, Metric, RunHook, RunStart, StepRecord};
use crate::domain::{RunResult, RunState};

/// One recorded hook invocation
#[derive(Debug, Clone)]
pub enum HookEvent {
    RunStart(RunStart),
    StepStart { step: u32, state: RunState },
    Metric { step: u32, metric: Metric },
    StepEnd { step: u32, record: StepRecord },
    RunEnd(Value),
}

/// Hook that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingHook {
    events: Mutex<Vec<HookEvent>>,
    fail: bool,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hook that records each event and then reports an error
    pub fn failing() -> Self {
        Self {
            events: Mutex::default(),
            fail: true,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HookEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<HookEvent> {
        self.lock().clone()
    }

    /// Step numbers seen by `on_step_start`, in order
    pub fn started_steps(&self) -> Vec<u32> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                HookEvent::StepStart { step, .. } => Some(*step),
                _ => None,
            })
            .collect()
    }

    /// Values reported for a named metric, in order
    pub fn metric_values(&self, name: &str) -> Vec<f64> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                HookEvent::Metric { metric, .. } if metric.name == name => Some(metric.value),
                _ => None,
            })
            .collect()
    }

    /// The result reported by `on_run_end`, if the run ended
    pub fn run_end(&self) -> Option<Value> {
        self.lock().iter().find_map(|e| match e {
            HookEvent::RunEnd(v) => Some(v.clone()),
            _ => None,
        })
    }

    fn record(&self, event: HookEvent) -> Result<(), HookError> {
        self.lock().push(event);
        if self.fail {
            return Err(HookError::Sink("recording hook configured to fail".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RunHook for RecordingHook {
    async fn on_run_start(&self, run: &RunStart) -> Result<(), HookError> {
        self.record(HookEvent::RunStart(run.clone()))
    }

    async fn on_step_start(&self, step: u32, state: &RunState) -> Result<(), HookError> {
        self.record(HookEvent::StepStart {
            step,
            state: state.clone(),
        })
    }

    async fn on_metric(&self, step: u32, metric: &Metric) -> Result<(), HookError> {
        self.record(HookEvent::Metric {
            step,
            metric: metric.clone(),
        })
    }

    async fn on_step_end(&self, step: u32, record: &StepRecord) -> Result<(), HookError> {
        self.record(HookEvent::StepEnd {
            step,
            record: record.clone(),
        })
    }

    async fn on_run_end(&self, result: &RunResult) -> Result<(), HookError> {
        self.record(HookEvent::RunEnd(result.to_value()))
    }
}
