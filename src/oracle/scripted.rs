//! Scripted oracle that replays canned responses per call name.
//!
//! Used to drive the loop controller deterministically in tests and in
//! offline dry runs. Responses queued for a call name are consumed in order;
//! once the queue is empty the repeating response (if any) is returned.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::{Oracle, OracleCall, OracleError};

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<Result<Value, String>>,
    repeat: Option<Value>,
}

#[derive(Debug, Default)]
struct Inner {
    scripts: HashMap<String, Script>,
    calls: Vec<OracleCall>,
}

/// Oracle fake with per-call-name response scripts
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    inner: Mutex<Inner>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a successful response for a call name
    pub fn with_response(self, name: &str, response: Value) -> Self {
        self.push(name, Ok(response));
        self
    }

    /// Queue a failure for a call name
    pub fn with_failure(self, name: &str, message: &str) -> Self {
        self.push(name, Err(message.to_string()));
        self
    }

    /// Response returned for a call name once its queue is drained
    pub fn with_repeating(self, name: &str, response: Value) -> Self {
        self.lock().scripts.entry(name.to_string()).or_default().repeat = Some(response);
        self
    }

    fn push(&self, name: &str, response: Result<Value, String>) {
        self.lock()
            .scripts
            .entry(name.to_string())
            .or_default()
            .queue
            .push_back(response);
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<OracleCall> {
        self.lock().calls.clone()
    }

    /// Number of calls received for a call name
    pub fn call_count(&self, name: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.name == name).count()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn call(&self, call: OracleCall) -> Result<Value, OracleError> {
        let mut inner = self.lock();
        let name = call.name.clone();
        inner.calls.push(call);

        let script = inner
            .scripts
            .get_mut(&name)
            .ok_or_else(|| OracleError::InvalidResponse(format!("no scripted response for '{}'", name)))?;

        match script.queue.pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(OracleError::InvalidResponse(message)),
            None => script
                .repeat
                .clone()
                .ok_or_else(|| OracleError::InvalidResponse(format!("script for '{}' is exhausted", name))),
        }
    }
}
