//! Append-only JSONL trace sink.
//!
//! Each hook event becomes one line: `{"event", "step", "timestamp", "payload"}`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tokio::io::AsyncWriteExt;

use super::{HookError, Metric, RunHook, RunStart, StepRecord};
use crate::domain::{RunResult, RunState};

/// Writes every hook event to a JSONL file
#[derive(Debug, Clone)]
pub struct JsonlTraceHook {
    path: PathBuf,
}

impl JsonlTraceHook {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, event: &str, step: Option<u32>, payload: Value) -> Result<(), HookError> {
        let record = json!({
            "event": event,
            "step": step,
            "timestamp": Utc::now().to_rfc3339(),
            "payload": payload,
        });
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl RunHook for JsonlTraceHook {
    async fn on_run_start(&self, run: &RunStart) -> Result<(), HookError> {
        self.append("run_start", None, serde_json::to_value(run)?).await
    }

    async fn on_step_start(&self, step: u32, state: &RunState) -> Result<(), HookError> {
        self.append("step_start", Some(step), state.snapshot()).await
    }

    async fn on_metric(&self, step: u32, metric: &Metric) -> Result<(), HookError> {
        self.append("metric", Some(step), serde_json::to_value(metric)?).await
    }

    async fn on_step_end(&self, step: u32, record: &StepRecord) -> Result<(), HookError> {
        self.append("step_end", Some(step), serde_json::to_value(record)?).await
    }

    async fn on_run_end(&self, result: &RunResult) -> Result<(), HookError> {
        self.append("run_end", None, result.to_value()).await
    }
}
