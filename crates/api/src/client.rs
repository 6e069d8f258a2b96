use std::time::Duration;

use chrono::Utc;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::{Map, Value, json};
use shopware_util::{build_query_pairs, parse_response_json, redact_sensitive, truncate_preview};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::Credentials;
use crate::error::{ApiError, AuthError, ConfigError};
use crate::response::{ApiResponse, collection_summary};
use crate::token::{CachedToken, TokenResponse};

const TOKEN_ENDPOINT: &str = "/api/oauth/token";
const ERROR_BODY_PREVIEW_LIMIT: usize = 2000;

/// Optional parts of an Admin API request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub json: Option<Value>,
    pub params: Option<Map<String, Value>>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn with_json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Authenticated client for one store's Admin API.
///
/// Holds the credentials, a shared `reqwest::Client` and at most one cached
/// bearer token. Tokens are fetched lazily on the first request and again
/// once the cached one has expired.
///
/// The token lock is never held while the token request is in flight, so
/// concurrent callers that all see an expired token may each fetch a new
/// one. The last fetch to finish wins the cache slot.
#[derive(Debug)]
pub struct AdminApiClient {
    credentials: Credentials,
    http: Client,
    token: RwLock<Option<CachedToken>>,
}

impl AdminApiClient {
    /// Build a client with the given per-request timeout.
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self, ConfigError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .user_agent(format!("shopware-mcp/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            credentials,
            http,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        self.credentials.base_url()
    }

    /// Whether a token is cached right now, expired or not.
    pub async fn has_cached_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Return a bearer token that is valid at this instant, fetching one when needed.
    ///
    /// # Errors
    /// [`AuthError`] when the token endpoint is unreachable, answers with a
    /// non-success status or returns a body without `access_token`. The cache
    /// is left empty in that case and the next call tries again.
    pub async fn ensure_valid_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.token.read().await.as_ref()
            && token.is_valid_at(Utc::now())
        {
            return Ok(token.access_token().to_string());
        }

        match self.request_new_token().await {
            Ok(token) => {
                let access_token = token.access_token().to_string();
                info!(expires_at = %token.expires_at(), "obtained new access token");
                *self.token.write().await = Some(token);
                Ok(access_token)
            }
            Err(auth_error) => {
                error!(error = %auth_error, "failed to obtain access token");
                *self.token.write().await = None;
                Err(auth_error)
            }
        }
    }

    async fn request_new_token(&self) -> Result<CachedToken, AuthError> {
        let url = format!("{}{}", self.credentials.base_url(), TOKEN_ENDPOINT);
        debug!(%url, client_id = self.credentials.client_id(), "requesting access token");

        let response = self
            .http
            .post(&url)
            .json(&json!({
                "grant_type": "client_credentials",
                "client_id": self.credentials.client_id(),
                "client_secret": self.credentials.client_secret(),
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status,
                body: truncate_preview(&redact_sensitive(&body), ERROR_BODY_PREVIEW_LIMIT),
            });
        }

        let token_response: TokenResponse =
            serde_json::from_str(&body).map_err(|parse_error| AuthError::InvalidResponse(parse_error.to_string()))?;
        CachedToken::from_response(token_response, Utc::now())
    }

    /// Issue a request against `{base_url}/api{endpoint}` with a valid bearer token.
    ///
    /// Caller headers are sent as given except `Authorization` and
    /// `Content-Type`, which are always set by the client. The response is
    /// returned without interpreting its status.
    pub async fn authenticated_request(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let token = self.ensure_valid_token().await?;
        let headers = build_headers(&options.headers, &token)?;
        let url = format!("{}/api{}", self.credentials.base_url(), endpoint);

        info!(%method, %url, "API request");
        debug!(headers = %redact_sensitive(&render_headers(&headers)), "request headers");

        let mut request = self.http.request(method.clone(), &url).headers(headers);
        if let Some(params) = options.params.as_ref() {
            debug!(params = %serde_json::Value::Object(params.clone()), "request params");
            request = request.query(&build_query_pairs(params));
        }
        if let Some(body) = options.json.as_ref() {
            debug!(body = %redact_sensitive(&pretty(body)), "request body");
            request = request.json(body);
        }

        let transport_error = |source: reqwest::Error| ApiError::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        };
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response.text().await.map_err(transport_error)?;

        info!(%method, %url, status = status.as_u16(), "API response");
        log_response_body(status.as_u16(), &body);

        Ok(ApiResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

fn build_headers(caller_headers: &[(String, String)], token: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    for (name, value) in caller_headers {
        let invalid = |reason: String| ApiError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| invalid(error.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|error| invalid(error.to_string()))?;
        headers.insert(header_name, header_value);
    }

    let authorization = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|error| ApiError::InvalidHeader {
        name: header::AUTHORIZATION.to_string(),
        reason: error.to_string(),
    })?;
    headers.insert(header::AUTHORIZATION, authorization);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn render_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value.to_str().unwrap_or("<binary>")))
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_response_body(status: u16, body: &str) {
    if status >= 400 {
        warn!(status, body = %truncate_preview(body, ERROR_BODY_PREVIEW_LIMIT), "error response");
        return;
    }

    let Some(parsed) = parse_response_json(body) else {
        debug!(body = %truncate_preview(body, ERROR_BODY_PREVIEW_LIMIT), "non-JSON response body");
        return;
    };
    if let Some((count, total)) = collection_summary(&parsed) {
        let total = total.map(Value::to_string).unwrap_or_else(|| "unknown".to_string());
        info!("response summary: {count} items (total: {total})");
    }
    debug!(body = %pretty(&parsed), "response body");
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AdminApiClient {
        let credentials = Credentials::new(server.uri(), "client-id", "client-secret").expect("valid credentials");
        AdminApiClient::new(credentials, Duration::from_secs(5)).expect("client builds")
    }

    async fn mount_token(server: &MockServer, token: &str, expires_in: i64, times: u64) {
        Mock::given(method("POST"))
            .and(path("/api/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "expires_in": expires_in,
                "access_token": token,
            })))
            .up_to_n_times(times)
            .expect(times)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn token_request_sends_client_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth/token"))
            .and(body_json(json!({
                "grant_type": "client_credentials",
                "client_id": "client-id",
                "client_secret": "client-secret",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = client.ensure_valid_token().await.expect("token");

        assert_eq!(token, "abc");
        assert!(client.has_cached_token().await);
    }

    #[tokio::test]
    async fn valid_token_is_reused() {
        let server = MockServer::start().await;
        mount_token(&server, "reused", 600, 1).await;
        Mock::given(method("GET"))
            .and(path("/api/product/1"))
            .and(header("authorization", "Bearer reused"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "1"}})))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for _ in 0..2 {
            let response = client
                .authenticated_request(Method::GET, "/product/1", RequestOptions::default())
                .await
                .expect("request succeeds");
            assert_eq!(response.status_code(), 200);
        }
    }

    #[tokio::test]
    async fn expired_token_is_replaced() {
        let server = MockServer::start().await;
        // expires_in equal to the safety margin yields an already expired token
        mount_token(&server, "first", 60, 1).await;
        mount_token(&server, "second", 600, 1).await;
        Mock::given(method("GET"))
            .and(path("/api/order"))
            .and(header("authorization", "Bearer first"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/order"))
            .and(header("authorization", "Bearer second"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .authenticated_request(Method::GET, "/order", RequestOptions::default())
            .await
            .expect("first request");
        client
            .authenticated_request(Method::GET, "/order", RequestOptions::default())
            .await
            .expect("second request");
    }

    #[tokio::test]
    async fn failed_token_fetch_leaves_cache_empty_and_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"errors": [{"code": "9"}]})))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        mount_token(&server, "recovered", 600, 1).await;

        let client = client_for(&server);
        let error = client.ensure_valid_token().await.expect_err("first fetch is rejected");
        assert!(matches!(error, AuthError::Rejected { status, .. } if status == 401));
        assert!(!client.has_cached_token().await);

        let token = client.ensure_valid_token().await.expect("second fetch succeeds");
        assert_eq!(token, "recovered");
    }

    #[tokio::test]
    async fn token_body_without_access_token_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"expires_in": 600})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client
            .authenticated_request(Method::GET, "/product", RequestOptions::default())
            .await
            .expect_err("no token");

        assert!(matches!(error, ApiError::Auth(AuthError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn out_of_range_token_lifetime_is_an_auth_error() {
        let server = MockServer::start().await;
        mount_token(&server, "abc", 9_000_000_000_000_000, 1).await;

        let client = client_for(&server);
        let error = client.ensure_valid_token().await.expect_err("lifetime overflows");

        assert!(matches!(error, AuthError::InvalidResponse(message) if message.contains("expires_in out of range")));
        assert!(!client.has_cached_token().await);
    }

    #[tokio::test]
    async fn injected_headers_override_caller_values() {
        let server = MockServer::start().await;
        mount_token(&server, "abc", 600, 1).await;
        Mock::given(method("POST"))
            .and(path("/api/_action/sync"))
            .and(header("authorization", "Bearer abc"))
            .and(header("content-type", "application/json"))
            .and(header("indexing-behavior", "use-queue-indexing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = RequestOptions::default()
            .with_json(json!({}))
            .with_header("Authorization", "Bearer forged")
            .with_header("Content-Type", "text/plain")
            .with_header("indexing-behavior", "use-queue-indexing");

        let response = client
            .authenticated_request(Method::POST, "/_action/sync", options)
            .await
            .expect("request succeeds");
        assert_eq!(response.status_code(), 200);
    }

    #[tokio::test]
    async fn params_are_sent_as_query_pairs() {
        let server = MockServer::start().await;
        mount_token(&server, "abc", 600, 1).await;
        Mock::given(method("GET"))
            .and(path("/api/product"))
            .and(query_param("limit", "5"))
            .and(query_param("term", "shirt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "total": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let params = json!({"limit": 5, "term": "shirt"});
        let options = RequestOptions::default().with_params(params.as_object().cloned().unwrap_or_default());

        client
            .authenticated_request(Method::GET, "/product", options)
            .await
            .expect("request succeeds");
    }

    #[tokio::test]
    async fn error_status_is_returned_not_raised() {
        let server = MockServer::start().await;
        mount_token(&server, "abc", 600, 1).await;
        Mock::given(method("DELETE"))
            .and(path("/api/product/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .authenticated_request(Method::DELETE, "/product/missing", RequestOptions::default())
            .await
            .expect("status errors are not client errors");

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.body, "not here");
    }

    #[test]
    fn invalid_caller_header_is_rejected() {
        let error = build_headers(&[("bad header".to_string(), "x".to_string())], "abc").expect_err("invalid name");
        assert!(matches!(error, ApiError::InvalidHeader { .. }));
    }
}
