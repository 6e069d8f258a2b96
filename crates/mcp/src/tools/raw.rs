use serde_json::Value;
use shopware_api::{Method, RequestOptions};

use super::arguments::{optional_object, optional_value};
use super::{AdminTools, JsonArgument, ToolError, normalize_endpoint, render_json, status_message};

/// Per-method rules for the passthrough tools.
///
/// Only an actual `204` gets the `no_content` text. A success status with an
/// empty body is reported as a `null` result.
struct Passthrough {
    method: Method,
    success: &'static [u16],
    /// Message suffix for `204 No Content`, for methods that accept it.
    no_content: Option<&'static str>,
}

const GET: Passthrough = Passthrough {
    method: Method::GET,
    success: &[200],
    no_content: None,
};
const POST: Passthrough = Passthrough {
    method: Method::POST,
    success: &[200, 201],
    no_content: None,
};
const PATCH: Passthrough = Passthrough {
    method: Method::PATCH,
    success: &[200, 204],
    no_content: Some("Entity updated (no content returned)."),
};
const DELETE: Passthrough = Passthrough {
    method: Method::DELETE,
    success: &[200, 204],
    no_content: Some("Entity deleted successfully."),
};

impl AdminTools {
    /// `GET` any Admin API endpoint.
    pub async fn raw_get(&self, endpoint: &str, params: Option<JsonArgument>) -> Result<String, ToolError> {
        self.passthrough(GET, endpoint, None, params).await
    }

    /// `POST` any Admin API endpoint. Succeeds on 200 and 201.
    pub async fn raw_post(
        &self,
        endpoint: &str,
        data: Option<JsonArgument>,
        params: Option<JsonArgument>,
    ) -> Result<String, ToolError> {
        self.passthrough(POST, endpoint, data, params).await
    }

    /// `PATCH` any Admin API endpoint. A 204 is reported as "no content".
    pub async fn raw_patch(
        &self,
        endpoint: &str,
        data: Option<JsonArgument>,
        params: Option<JsonArgument>,
    ) -> Result<String, ToolError> {
        self.passthrough(PATCH, endpoint, data, params).await
    }

    /// `DELETE` any Admin API endpoint.
    pub async fn raw_delete(&self, endpoint: &str, params: Option<JsonArgument>) -> Result<String, ToolError> {
        self.passthrough(DELETE, endpoint, None, params).await
    }

    async fn passthrough(
        &self,
        rules: Passthrough,
        endpoint: &str,
        data: Option<JsonArgument>,
        params: Option<JsonArgument>,
    ) -> Result<String, ToolError> {
        let data = optional_value(data, "data")?;
        let params = optional_object(params, "params")?;
        let endpoint = normalize_endpoint(endpoint);
        let verb = rules.method.as_str().to_string();
        let context = format!("Error making {verb} request to '{endpoint}'");

        let mut options = RequestOptions::default();
        if let Some(body) = data.filter(|body| !body.is_null()) {
            options = options.with_json(body);
        }
        if let Some(params) = params {
            options = options.with_params(params);
        }

        let response = self
            .client()
            .authenticated_request(rules.method.clone(), &endpoint, options)
            .await
            .map_err(ToolError::request(&context))?;

        let status = response.status_code();
        if !rules.success.contains(&status) {
            return Err(ToolError::upstream(
                status,
                format!("{verb} request failed for endpoint '{endpoint}' with {}", status_message(&response)),
            ));
        }

        if let (204, Some(no_content)) = (status, rules.no_content) {
            return Ok(format!("{verb} request successful for endpoint '{endpoint}'. {no_content}"));
        }

        let result = if response.body.trim().is_empty() {
            Value::Null
        } else {
            response.json().map_err(ToolError::response(&context))?
        };
        Ok(format!(
            "{verb} request successful for endpoint '{endpoint}'. Result: {}",
            render_json(&result)
        ))
    }
}
