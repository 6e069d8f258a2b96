//! Tool arguments that accept either structured JSON or a JSON-encoded string.
//!
//! Agents are inconsistent about whether they send `{"limit": 5}` or
//! `"{\"limit\": 5}"`, so every JSON-ish argument is a [`JsonArgument`] and is
//! normalised exactly once at the start of the operation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A JSON argument as sent by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum JsonArgument {
    /// JSON text that still has to be parsed.
    Text(String),
    /// Already structured JSON.
    Structured(Value),
}

impl JsonArgument {
    /// Parse the text variant, pass the structured one through.
    pub fn into_value(self, argument: &'static str) -> Result<Value, InputError> {
        match self {
            JsonArgument::Text(text) => {
                serde_json::from_str(&text).map_err(|source| InputError::InvalidJson { argument, source })
            }
            JsonArgument::Structured(value) => Ok(value),
        }
    }

    /// Like [`JsonArgument::into_value`] but requires a JSON object.
    pub fn into_object(self, argument: &'static str) -> Result<Map<String, Value>, InputError> {
        match self.into_value(argument)? {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            _ => Err(InputError::NotAnObject { argument }),
        }
    }
}

impl From<Value> for JsonArgument {
    fn from(value: Value) -> Self {
        JsonArgument::Structured(value)
    }
}

impl From<&str> for JsonArgument {
    fn from(text: &str) -> Self {
        JsonArgument::Text(text.to_string())
    }
}

pub(crate) fn optional_value(argument: Option<JsonArgument>, name: &'static str) -> Result<Option<Value>, InputError> {
    argument.map(|value| value.into_value(name)).transpose()
}

pub(crate) fn optional_object(
    argument: Option<JsonArgument>,
    name: &'static str,
) -> Result<Option<Map<String, Value>>, InputError> {
    argument.map(|value| value.into_object(name)).transpose()
}

/// Rejected tool input. No request is sent when one of these is raised.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid JSON in {argument}: {source}")]
    InvalidJson {
        argument: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid JSON in {argument}: expected a JSON object")]
    NotAnObject { argument: &'static str },

    #[error("Invalid action '{0}'. Must be 'upsert' or 'delete'.")]
    InvalidAction(String),

    #[error("Invalid indexing_behavior '{0}'. Must be one of: use-queue-indexing, disable-indexing (omit for synchronous indexing)")]
    InvalidIndexingBehavior(String),

    #[error("Payload must be a list of objects (for upsert) or IDs (for delete).")]
    PayloadNotSequence,
}
