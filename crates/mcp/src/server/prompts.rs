//! MCP prompts exposed by the server.

use rmcp::model::{ErrorData, GetPromptResult, ListPromptsResult, Prompt, PromptMessage, PromptMessageRole};
use serde_json::json;

use crate::server::instrument::instrument_text;
use crate::tools::AdminTools;

pub const READY_TO_SHIP_ORDERS: &str = "ready_to_ship_orders";

/// List the prompts served by this server.
pub fn list_prompts() -> ListPromptsResult {
    ListPromptsResult::with_all_items(vec![prompt_definition(
        READY_TO_SHIP_ORDERS,
        "Paid orders with an open delivery, newest first (up to 50), with customer, shipping address and line items.",
    )])
}

/// Resolve a prompt by name. Unknown names are an `invalid_params` error.
pub async fn get_prompt(name: &str, tools: &AdminTools) -> Result<GetPromptResult, ErrorData> {
    match name {
        READY_TO_SHIP_ORDERS => {
            let text = instrument_text(READY_TO_SHIP_ORDERS, &json!({}), tools.ready_to_ship_orders()).await;
            Ok(GetPromptResult {
                description: Some("Orders that are ready to ship".to_string()),
                messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
            })
        }
        _ => Err(ErrorData::invalid_params(
            format!("prompt '{name}' was not found"),
            Some(json!({ "name": name, "available": [READY_TO_SHIP_ORDERS] })),
        )),
    }
}

fn prompt_definition(name: &str, description: &str) -> Prompt {
    Prompt {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        arguments: None,
        icons: None,
        meta: None,
    }
}
