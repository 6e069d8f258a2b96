//! Admin API operations exposed as MCP tools.
//!
//! Each operation normalises its arguments, performs one request through the
//! shared [`AdminApiClient`] and renders the outcome as text for the agent.
//! Operations return `Result<String, ToolError>`; the MCP layer turns both
//! arms into a text result.

mod arguments;
mod entity;
mod error;
mod raw;
mod ready_to_ship;
mod schema;
mod search;
mod sync;

use std::sync::Arc;

use serde_json::Value;
use shopware_api::{AdminApiClient, ApiResponse};

pub use arguments::{InputError, JsonArgument};
pub use error::{ToolError, into_message};
pub use sync::{IndexingBehavior, SyncAction};

/// The tool set bound to one store connection.
#[derive(Debug, Clone)]
pub struct AdminTools {
    client: Arc<AdminApiClient>,
}

impl AdminTools {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AdminApiClient {
        &self.client
    }
}

/// Prefix an endpoint with `/` when the caller left it out.
pub(crate) fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{endpoint}")
    }
}

/// Compact JSON rendering used in result messages.
pub(crate) fn render_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

pub(crate) fn render_json_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Number of records under `data`, zero when missing.
pub(crate) fn data_count(body: &Value) -> usize {
    match body.get("data") {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        _ => 0,
    }
}

/// `total` of a search result rendered for messages, `unknown` when absent.
pub(crate) fn total_label(body: &Value) -> String {
    match body.get("total") {
        Some(Value::Null) | None => "unknown".to_string(),
        Some(total) => render_json(total),
    }
}

pub(crate) fn status_message(response: &ApiResponse) -> String {
    format!("status {}: {}", response.status_code(), response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_gets_leading_slash() {
        assert_eq!(normalize_endpoint("product"), "/product");
        assert_eq!(normalize_endpoint("/product"), "/product");
    }

    #[test]
    fn total_label_falls_back_to_unknown() {
        assert_eq!(total_label(&json!({"total": 12})), "12");
        assert_eq!(total_label(&json!({"data": []})), "unknown");
    }

    #[test]
    fn data_count_handles_missing_data() {
        assert_eq!(data_count(&json!({"data": ["a", "b", "c"]})), 3);
        assert_eq!(data_count(&json!({})), 0);
    }
}
