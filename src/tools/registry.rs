//! Tool registry - maps tool names to invocable capabilities

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::Tool;
use crate::error::{AgentError, Result};

/// Named tools available to an agent run.
///
/// Treated as read-only once a run starts; cloning is cheap.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    names: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry contents with the given tools
    pub fn register<I, S>(&mut self, tools: I)
    where
        I: IntoIterator<Item = (S, Arc<dyn Tool>)>,
        S: Into<String>,
    {
        self.tools.clear();
        self.names.clear();

        for (name, tool) in tools {
            let name = name.into();
            if self.tools.insert(name.clone(), tool).is_none() {
                self.names.push(name);
            }
        }

        log::info!("Registered {} tools: {}", self.names.len(), self.names.join(", "));
    }

    /// Registered tool names, in registration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name
    pub async fn invoke(&self, name: &str, params: Map<String, Value>) -> Result<Value> {
        let tool = self.tools.get(name).ok_or_else(|| AgentError::ToolNotFound {
            name: name.to_string(),
            available: self.names.clone(),
        })?;

        tool.invoke(params).await.map_err(|e| AgentError::ToolExecution {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("names", &self.names).finish()
    }
}
