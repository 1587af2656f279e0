//! Decision phase output.
//!
//! An Action is a tagged union: either invoke a registered tool with a
//! parameter mapping, or finish with a structured output. Oracle responses
//! arrive in the flat `ActionWire` shape and are validated into an Action.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use super::ValidationError;

/// Parameter mapping handed to a tool
pub type ToolParams = BTreeMap<String, ParamValue>;

/// A value that has a canonical structured serialization
pub trait CanonicalForm: Send + Sync + fmt::Debug {
    fn to_canonical(&self) -> Result<Value, serde_json::Error>;
}

impl<T> CanonicalForm for T
where
    T: Serialize + Send + Sync + fmt::Debug,
{
    fn to_canonical(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A tool parameter value before it crosses the tool boundary.
///
/// Oracle-produced parameters are always `Data`. Callers building actions
/// in-process may pass typed objects, which are normalized to plain data
/// before dispatch.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Data(Value),
    Typed(Arc<dyn CanonicalForm>),
    List(Vec<ParamValue>),
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Wrap a typed object
    pub fn typed<T: CanonicalForm + 'static>(object: T) -> Self {
        ParamValue::Typed(Arc::new(object))
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue::Data(value)
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Data(value) => value.serialize(serializer),
            ParamValue::Typed(object) => object
                .to_canonical()
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer),
            ParamValue::List(items) => items.serialize(serializer),
            ParamValue::Map(entries) => entries.serialize(serializer),
        }
    }
}

/// The next step chosen by the decision oracle
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action_type", rename_all = "snake_case")]
pub enum Action {
    UseTool { tool_name: String, tool_params: ToolParams },
    Finish { output: Option<Map<String, Value>> },
}

impl Action {
    /// Build a tool action from plain JSON parameters
    pub fn use_tool(tool_name: impl Into<String>, params: Map<String, Value>) -> Self {
        Action::UseTool {
            tool_name: tool_name.into(),
            tool_params: params.into_iter().map(|(k, v)| (k, ParamValue::Data(v))).collect(),
        }
    }

    /// Build a finish action
    pub fn finish(output: Map<String, Value>) -> Self {
        Action::Finish { output: Some(output) }
    }

    /// Decode and validate a structured oracle response
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let wire: ActionWire = serde_json::from_value(value)
            .map_err(|e| ValidationError::new(format!("invalid action: {}", e)))?;
        Action::try_from(wire)
    }

    /// Plain JSON rendering for hook records
    pub fn to_record(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| serde_json::json!({ "unserializable": e.to_string() }))
    }
}

/// Flat action shape exchanged with the decision oracle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionWire {
    pub action_type: String,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_params: Option<Map<String, Value>>,
    #[serde(default)]
    pub output: Option<Map<String, Value>>,
}

impl TryFrom<ActionWire> for Action {
    type Error = ValidationError;

    fn try_from(wire: ActionWire) -> Result<Self, Self::Error> {
        match wire.action_type.as_str() {
            "use_tool" => {
                let tool_name = wire
                    .tool_name
                    .filter(|name| !name.trim().is_empty())
                    .ok_or_else(|| ValidationError::new("use_tool action requires a non-empty tool_name"))?;
                Ok(Action::use_tool(tool_name, wire.tool_params.unwrap_or_default()))
            }
            "finish" => Ok(Action::Finish { output: wire.output }),
            other => Err(ValidationError::new(format!(
                "unknown action_type '{}', expected 'use_tool' or 'finish'",
                other
            ))),
        }
    }
}
