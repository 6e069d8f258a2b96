use serde_json::{Map, Value};
use shopware_api::{Method, RequestOptions};

use super::arguments::optional_value;
use super::{AdminTools, JsonArgument, ToolError, render_json};

impl AdminTools {
    /// `GET /{entity}/{id}`, optionally loading associations.
    ///
    /// Associations travel as a JSON-encoded `associations` query parameter.
    /// A 404 is reported as a plain "not found" message.
    pub async fn get_entity_by_id(
        &self,
        entity: &str,
        entity_id: &str,
        associations: Option<JsonArgument>,
    ) -> Result<String, ToolError> {
        let associations = optional_value(associations, "associations")?;
        let context = format!("Error retrieving {entity} with ID '{entity_id}'");

        let mut options = RequestOptions::default();
        if let Some(associations) = associations.filter(has_content) {
            let mut params = Map::new();
            params.insert("associations".to_string(), Value::String(render_json(&associations)));
            options = options.with_params(params);
        }

        let response = self
            .client()
            .authenticated_request(Method::GET, &format!("/{entity}/{entity_id}"), options)
            .await
            .map_err(ToolError::request(&context))?;

        match response.status_code() {
            200 => {
                let result = response.json().map_err(ToolError::response(&context))?;
                Ok(format!(
                    "Successfully retrieved {entity} with ID '{entity_id}'. Result: {}",
                    render_json(&result)
                ))
            }
            404 => Ok(format!("Entity '{entity}' with ID '{entity_id}' not found.")),
            status => Err(ToolError::upstream(
                status,
                format!(
                    "Failed to retrieve {entity} with ID '{entity_id}'. Status {status}: {}",
                    response.body
                ),
            )),
        }
    }
}

/// `null`, `{}`, `[]` and `""` mean "no associations".
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_associations_are_skipped() {
        assert!(!has_content(&json!({})));
        assert!(!has_content(&json!(null)));
        assert!(has_content(&json!({"manufacturer": {}})));
    }
}
