//! Response body parsing helpers.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::text_processing::truncate_preview;

const BODY_PREVIEW_LIMIT: usize = 200;

/// Parse response text as JSON, discarding the error.
///
/// # Example
/// ```rust
/// use shopware_util::http::parse_response_json;
///
/// assert!(parse_response_json(r#"{"data": []}"#).is_some());
/// assert!(parse_response_json("<html>").is_none());
/// ```
pub fn parse_response_json(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text).ok()
}

/// Parse HTTP response text into JSON, providing detailed errors on failure.
///
/// Any parse failure is decorated with the originating status code and a
/// truncated preview of the body. Use this when a JSON response is required
/// and the caller should surface failures instead of degrading to `null`.
///
/// # Errors
/// Returns a [`JsonParseError`] carrying the serde error and up to 200
/// characters of the body with whitespace collapsed.
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    serde_json::from_str::<Value>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        let preview = truncate_preview(text, BODY_PREVIEW_LIMIT);

        JsonParseError::new(status_note, error, preview)
    })
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    /// Truncated response preview captured during parsing.
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}
