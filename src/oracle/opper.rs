//! Opper API client implementation
//!
//! This module implements the Oracle trait over the Opper structured-call
//! HTTP API: one POST per call, result read from `json_payload`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{Oracle, OracleCall, OracleError};

/// Opper API base URL
const OPPER_API_URL: &str = "https://api.opper.ai/v2";

/// Environment variable holding the API key
const OPPER_API_KEY_ENV: &str = "OPPER_API_KEY";

/// Configuration for the Opper client
#[derive(Debug, Clone)]
pub struct OpperConfig {
    pub base_url: String,
    pub model: Option<String>,
    /// Transport-level timeout; `None` lets a call block as long as the server does
    pub timeout: Option<Duration>,
}

impl Default for OpperConfig {
    fn default() -> Self {
        Self {
            base_url: OPPER_API_URL.to_string(),
            model: None,
            timeout: None,
        }
    }
}

/// Opper API client
pub struct OpperClient {
    client: Client,
    api_key: String,
    config: OpperConfig,
}

impl OpperClient {
    /// Create a new Opper client
    ///
    /// Reads OPPER_API_KEY from environment
    pub fn new(config: OpperConfig) -> Result<Self, OracleError> {
        let api_key = std::env::var(OPPER_API_KEY_ENV).map_err(|_| OracleError::MissingApiKey {
            env_var: OPPER_API_KEY_ENV.to_string(),
        })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: impl Into<String>, config: OpperConfig) -> Result<Self, OracleError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn call_url(&self) -> String {
        format!("{}/call", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the request body for a call
    fn build_request(&self, call: &OracleCall) -> Value {
        let mut body = json!({
            "name": call.name,
            "instructions": call.instructions,
            "input": call.input,
            "output_schema": call.output_schema,
        });

        if let Some(model) = &self.config.model {
            body["model"] = json!(model);
        }

        body
    }

    /// Extract the structured result from a response body
    fn parse_response(body: Value) -> Result<Value, OracleError> {
        match body.get("json_payload") {
            Some(Value::Null) | None => Err(OracleError::InvalidResponse(
                "response has no json_payload".to_string(),
            )),
            Some(payload) => Ok(payload.clone()),
        }
    }

    /// Send a request to the Opper API
    async fn send_request(&self, body: Value) -> Result<Value, OracleError> {
        let response = self
            .client
            .post(self.call_url())
            .header("x-opper-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Oracle for OpperClient {
    async fn call(&self, call: OracleCall) -> Result<Value, OracleError> {
        log::debug!("Oracle call '{}'", call.name);
        let body = self.build_request(&call);
        let response = self.send_request(body).await?;
        Self::parse_response(response)
    }
}

impl std::fmt::Debug for OpperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpperClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}
