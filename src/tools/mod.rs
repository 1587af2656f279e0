//! Tool System - invocable capabilities, registry, and parameter normalization
//!
//! Every tool is an opaque `(params) -> result | error` capability. The loop
//! controller only ever sees the ToolRegistry.

mod github_pr;
mod normalize;
mod registry;

pub use github_pr::{DEFAULT_MAX_DIFF_CHARS, GITHUB_API_URL, GitHubPrTool, GitHubPrToolInput};
pub use normalize::{normalize_params, normalize_value};
pub use registry::ToolRegistry;

use std::future::Future;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised by a tool invocation
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("{0}")]
    Failed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tool call timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// A capability the agent can invoke by name
#[async_trait]
pub trait Tool: Send + Sync {
    /// Human-readable description
    fn description(&self) -> &str {
        ""
    }

    /// Run the tool with plain structured parameters
    async fn invoke(&self, params: Map<String, Value>) -> Result<Value, ToolError>;
}

type ToolFn = dyn Fn(Map<String, Value>) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync;

/// Adapts an async closure into a Tool
pub struct FnTool {
    description: String,
    f: Box<ToolFn>,
}

impl FnTool {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        Self {
            description: String::new(),
            f: Box::new(move |params| f(params).boxed()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[async_trait]
impl Tool for FnTool {
    fn description(&self) -> &str {
        &self.description
    }

    async fn invoke(&self, params: Map<String, Value>) -> Result<Value, ToolError> {
        (self.f)(params).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool").field("description", &self.description).finish()
    }
}
