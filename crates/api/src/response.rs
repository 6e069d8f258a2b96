use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;
use shopware_util::{JsonParseError, parse_response_json_strict};

/// Uninterpreted result of an Admin API call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    /// Parse the body as JSON, keeping status and a body preview on failure.
    pub fn json(&self) -> Result<Value, JsonParseError> {
        parse_response_json_strict(&self.body, Some(self.status))
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }
}

/// Item count and total of a `{"data": [...], "total": n}` search result.
///
/// Returns `None` when the value is not an object with a `data` key. A
/// non-array `data` counts as a single item.
pub fn collection_summary(body: &Value) -> Option<(usize, Option<&Value>)> {
    let data = body.as_object()?.get("data")?;
    let count = data.as_array().map(Vec::len).unwrap_or(1);
    Some((count, body.get("total")))
}
