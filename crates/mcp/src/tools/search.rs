use serde_json::{Map, Value, json};
use shopware_api::{Method, RequestOptions};

use super::arguments::optional_object;
use super::{AdminTools, JsonArgument, ToolError, data_count, render_json, status_message, total_label};

impl AdminTools {
    /// `POST /search/{entity}` with the given criteria.
    ///
    /// Product searches without a `filter` only return parent products, the
    /// same default the administration uses.
    pub async fn search_entities(&self, entity: &str, search_criteria: Option<JsonArgument>) -> Result<String, ToolError> {
        let criteria = prepare_criteria(entity, search_criteria)?;
        let context = format!("Error searching entity '{entity}'");

        let response = self
            .client()
            .authenticated_request(Method::POST, &format!("/search/{entity}"), RequestOptions::default().with_json(criteria))
            .await
            .map_err(ToolError::request(&context))?;

        if response.status_code() != 200 {
            return Err(ToolError::upstream(
                response.status_code(),
                format!("Search failed for entity '{entity}' with {}", status_message(&response)),
            ));
        }

        let result = response.json().map_err(ToolError::response(&context))?;
        Ok(format!(
            "Search successful for entity '{entity}'. Retrieved {} items (total: {}). Result: {}",
            data_count(&result),
            total_label(&result),
            render_json(&result)
        ))
    }

    /// `POST /search-ids/{entity}`, returning only matching IDs.
    pub async fn search_entity_ids(&self, entity: &str, search_criteria: Option<JsonArgument>) -> Result<String, ToolError> {
        let criteria = prepare_criteria(entity, search_criteria)?;
        let context = format!("Error searching entity IDs for '{entity}'");

        let response = self
            .client()
            .authenticated_request(
                Method::POST,
                &format!("/search-ids/{entity}"),
                RequestOptions::default().with_json(criteria),
            )
            .await
            .map_err(ToolError::request(&context))?;

        if response.status_code() != 200 {
            return Err(ToolError::upstream(
                response.status_code(),
                format!("ID search failed for entity '{entity}' with {}", status_message(&response)),
            ));
        }

        let result = response.json().map_err(ToolError::response(&context))?;
        Ok(format!(
            "ID search successful for entity '{entity}'. Found {} matching IDs (total: {}). Result: {}",
            data_count(&result),
            total_label(&result),
            render_json(&result)
        ))
    }
}

fn prepare_criteria(entity: &str, search_criteria: Option<JsonArgument>) -> Result<Value, ToolError> {
    let mut criteria = optional_object(search_criteria, "search_criteria")?.unwrap_or_default();
    apply_product_default_filter(entity, &mut criteria);
    Ok(Value::Object(criteria))
}

/// Limit product searches to parent products unless the caller filters.
fn apply_product_default_filter(entity: &str, criteria: &mut Map<String, Value>) {
    if entity == "product" && !criteria.contains_key("filter") {
        criteria.insert(
            "filter".to_string(),
            json!([{"type": "equals", "field": "parentId", "value": null}]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_without_filter_gets_parent_filter() {
        let criteria = prepare_criteria("product", Some(json!({"limit": 5}).into())).expect("valid criteria");
        assert_eq!(
            criteria,
            json!({
                "limit": 5,
                "filter": [{"type": "equals", "field": "parentId", "value": null}]
            })
        );
    }

    #[test]
    fn product_with_filter_is_untouched() {
        let supplied = json!({"filter": [{"type": "equals", "field": "active", "value": true}]});
        let criteria = prepare_criteria("product", Some(supplied.clone().into())).expect("valid criteria");
        assert_eq!(criteria, supplied);
    }

    #[test]
    fn other_entities_get_no_default_filter() {
        let criteria = prepare_criteria("order", None).expect("valid criteria");
        assert_eq!(criteria, json!({}));
    }

    #[test]
    fn string_criteria_are_parsed() {
        let criteria = prepare_criteria("customer", Some("{\"limit\": 1}".into())).expect("valid criteria");
        assert_eq!(criteria, json!({"limit": 1}));
    }
}
