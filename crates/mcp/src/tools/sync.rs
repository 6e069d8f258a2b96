use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};
use shopware_api::{Method, RequestOptions};

use super::{AdminTools, InputError, JsonArgument, ToolError, render_json, status_message};

/// Write action of a single sync operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Upsert,
    Delete,
}

impl SyncAction {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncAction::Upsert => "upsert",
            SyncAction::Delete => "delete",
        }
    }
}

impl FromStr for SyncAction {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "upsert" => Ok(SyncAction::Upsert),
            "delete" => Ok(SyncAction::Delete),
            other => Err(InputError::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `indexing-behavior` header. Absent means synchronous indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexingBehavior {
    UseQueueIndexing,
    DisableIndexing,
}

impl IndexingBehavior {
    pub fn as_str(self) -> &'static str {
        match self {
            IndexingBehavior::UseQueueIndexing => "use-queue-indexing",
            IndexingBehavior::DisableIndexing => "disable-indexing",
        }
    }
}

impl FromStr for IndexingBehavior {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "use-queue-indexing" => Ok(IndexingBehavior::UseQueueIndexing),
            "disable-indexing" => Ok(IndexingBehavior::DisableIndexing),
            other => Err(InputError::InvalidIndexingBehavior(other.to_string())),
        }
    }
}

/// One validated sync operation, ready to be sent.
#[derive(Debug)]
struct SyncOperation {
    key: String,
    entity: String,
    action: SyncAction,
    payload: Vec<Value>,
    indexing_behavior: Option<IndexingBehavior>,
    skip_trigger_flow: bool,
}

impl SyncOperation {
    fn parse(
        entity: &str,
        action: &str,
        payload: JsonArgument,
        operation_key: Option<String>,
        indexing_behavior: Option<&str>,
        skip_trigger_flow: bool,
    ) -> Result<Self, InputError> {
        let payload = payload.into_value("payload")?;
        let action = action.parse::<SyncAction>()?;
        let indexing_behavior = indexing_behavior.map(str::parse::<IndexingBehavior>).transpose()?;
        let Value::Array(payload) = payload else {
            return Err(InputError::PayloadNotSequence);
        };

        Ok(Self {
            key: operation_key.unwrap_or_else(|| format!("{action}-{entity}")),
            entity: entity.to_string(),
            action,
            payload,
            indexing_behavior,
            skip_trigger_flow,
        })
    }

    fn body(&self) -> Value {
        json!({
            (self.key.clone()): {
                "entity": self.entity,
                "action": self.action.as_str(),
                "payload": self.payload,
            }
        })
    }

    fn request_options(&self) -> RequestOptions {
        let mut options = RequestOptions::default().with_json(self.body());
        if let Some(behavior) = self.indexing_behavior {
            options = options.with_header("indexing-behavior", behavior.as_str());
        }
        if self.skip_trigger_flow {
            options = options.with_header("sw-skip-trigger-flow", "1");
        }
        options
    }

    /// ` (Performance: indexing: ..., flows: skipped)` or empty.
    fn performance_note(&self) -> String {
        let mut applied = Vec::new();
        if let Some(behavior) = self.indexing_behavior {
            applied.push(format!("indexing: {}", behavior.as_str()));
        }
        if self.skip_trigger_flow {
            applied.push("flows: skipped".to_string());
        }
        if applied.is_empty() {
            String::new()
        } else {
            format!(" (Performance: {})", applied.join(", "))
        }
    }
}

impl AdminTools {
    /// One upsert or delete operation through `POST /_action/sync`.
    ///
    /// Multi-operation payloads have to go through `raw_post` instead.
    pub async fn sync_operation(
        &self,
        entity: &str,
        action: &str,
        payload: JsonArgument,
        operation_key: Option<String>,
        indexing_behavior: Option<&str>,
        skip_trigger_flow: bool,
    ) -> Result<String, ToolError> {
        let operation = SyncOperation::parse(entity, action, payload, operation_key, indexing_behavior, skip_trigger_flow)?;
        let context = format!("Error executing sync operation for entity '{entity}'");

        let response = self
            .client()
            .authenticated_request(Method::POST, "/_action/sync", operation.request_options())
            .await
            .map_err(ToolError::request(&context))?;

        let status = response.status_code();
        if status != 200 && status != 201 {
            return Err(ToolError::upstream(
                status,
                format!("Sync operation failed with {}", status_message(&response)),
            ));
        }

        let result = response.json().map_err(ToolError::response(&context))?;
        Ok(format!(
            "Sync operation '{}' successful. {}. Not found: {}, Deleted: {}.{} Full result: {}",
            operation.key,
            summarize_written(&result),
            array_len(&result, "notFound"),
            array_len(&result, "deleted"),
            operation.performance_note(),
            render_json(&result)
        ))
    }
}

/// `product: 2 items; product_translation: 2 items` from the `data` map.
fn summarize_written(result: &Value) -> String {
    let parts = result
        .get("data")
        .and_then(Value::as_object)
        .map(|data| {
            data.iter()
                .map(|(entity_type, written)| match written.as_array() {
                    Some(items) => format!("{entity_type}: {} items", items.len()),
                    None => format!("{entity_type}: 1 item"),
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if parts.is_empty() {
        "No data returned".to_string()
    } else {
        parts.join("; ")
    }
}

fn array_len(result: &Value, key: &str) -> usize {
    match result.get(key) {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        _ => 0,
    }
}
