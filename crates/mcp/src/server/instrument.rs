//! Uniform logging around tool handlers.
//!
//! Every tool goes through [`instrument`], which logs the call, runs the
//! operation, logs the outcome and converts it into an MCP text result.

use std::future::Future;
use std::time::Instant;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::{Map, Value};
use shopware_util::redact_sensitive;
use tracing::{debug, info, warn};

use crate::tools::ToolError;

const MAX_LOG_PAYLOAD_BYTES: usize = 64 * 1024;

/// Run a tool operation with logging and wrap its text in a tool result.
///
/// Both success and failure become a successful `CallToolResult` carrying
/// the message; the agent reads the text to decide what happened.
pub(crate) async fn instrument<A, F>(tool_name: &str, arguments: &A, operation: F) -> CallToolResult
where
    A: Serialize,
    F: Future<Output = Result<String, ToolError>>,
{
    let text = instrument_text(tool_name, arguments, operation).await;
    CallToolResult::success(vec![Content::text(text)])
}

/// Run an operation with logging and collapse its outcome into text.
pub(crate) async fn instrument_text<A, F>(tool_name: &str, arguments: &A, operation: F) -> String
where
    A: Serialize,
    F: Future<Output = Result<String, ToolError>>,
{
    let request = serde_json::to_value(arguments).unwrap_or(Value::Null);
    info!(tool = tool_name, "tool called");
    debug!(tool = tool_name, arguments = %redact_sensitive(&request.to_string()), "tool arguments");

    let started = Instant::now();
    let outcome = operation.await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let text = match outcome {
        Ok(text) => {
            info!(tool = tool_name, elapsed_ms, "tool succeeded");
            text
        }
        Err(error) => {
            warn!(tool = tool_name, elapsed_ms, kind = error.kind(), error = %error, "tool failed");
            error.to_string()
        }
    };

    if let Some(payload) = build_log_payload(Some(request), Some(Value::String(text.clone()))) {
        debug!(tool = tool_name, payload = %payload, "tool payload");
    }

    text
}

/// `{request, response}` for debug logs, or `None` when too large or empty.
pub(crate) fn build_log_payload(request: Option<Value>, response: Option<Value>) -> Option<Value> {
    let mut payload = Map::new();
    if let Some(request_value) = request {
        payload.insert("request".to_string(), request_value);
    }
    if let Some(response_value) = response {
        payload.insert("response".to_string(), response_value);
    }
    if payload.is_empty() {
        return None;
    }

    let payload = Value::Object(payload);
    if is_payload_within_size_limit(&payload) {
        Some(payload)
    } else {
        None
    }
}

fn is_payload_within_size_limit(payload: &Value) -> bool {
    serde_json::to_vec(payload)
        .map(|bytes| bytes.len() <= MAX_LOG_PAYLOAD_BYTES)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::InputError;
    use serde_json::json;

    fn result_text(result: &CallToolResult) -> String {
        let rendered = serde_json::to_value(result).expect("result serializes");
        rendered["content"][0]["text"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn failures_become_text_results() {
        let arguments = json!({"action": "merge"});
        let result = instrument("shopware_sync_operation", &arguments, async {
            Err(ToolError::Input(InputError::InvalidAction("merge".to_string())))
        })
        .await;

        assert_eq!(serde_json::to_value(&result).expect("result serializes")["isError"], false);
        assert_eq!(result_text(&result), "Invalid action 'merge'. Must be 'upsert' or 'delete'.");
    }

    #[tokio::test]
    async fn successes_pass_text_through() {
        let result = instrument("get_available_entities", &json!({}), async { Ok("Available entities (0 total)".to_string()) }).await;
        assert_eq!(result_text(&result), "Available entities (0 total)");
    }

    #[test]
    fn oversized_payload_is_dropped() {
        let huge = Value::String("x".repeat(MAX_LOG_PAYLOAD_BYTES + 1));
        assert!(build_log_payload(None, Some(huge)).is_none());
        assert!(build_log_payload(None, None).is_none());
    }

    #[test]
    fn payload_contains_request_and_response() {
        let payload = build_log_payload(Some(json!({"entity": "product"})), Some(json!("ok"))).expect("payload");
        assert_eq!(payload["request"]["entity"], "product");
        assert_eq!(payload["response"], "ok");
    }
}
