//! Conversion of JSON parameter objects into URL query pairs.

use serde_json::{Map, Value};

/// Flatten a JSON object into query pairs.
///
/// Strings are passed verbatim, other scalars use their JSON text, arrays
/// repeat the key once per element and nested objects are JSON-encoded.
/// `null` values are dropped so optional parameters can be sent as `null`.
///
/// ```rust
/// use serde_json::json;
/// use shopware_util::http::build_query_pairs;
///
/// let params = json!({"limit": 5, "term": "shirt"});
/// let pairs = build_query_pairs(params.as_object().unwrap());
/// assert_eq!(pairs, vec![
///     ("limit".to_string(), "5".to_string()),
///     ("term".to_string(), "shirt".to_string()),
/// ]);
/// ```
pub fn build_query_pairs(query_parameters: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in query_parameters {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    pairs.push((key.clone(), query_value_to_string(item)));
                }
            }
            other => pairs.push((key.clone(), query_value_to_string(other))),
        }
    }
    pairs
}

fn query_value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
