#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use shopware_api::{AdminApiClient, Credentials};
use shopware_mcp::{AdminTools, ToolError, into_message};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";

/// Mock server with a token endpoint that answers exactly once.
pub async fn store() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 600,
            "access_token": TOKEN,
        })))
        .expect(1)
        .mount(&server)
        .await;
    server
}

/// Mock server that fails verification if it receives any request.
pub async fn idle_store() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    server
}

pub fn tools_for(server: &MockServer) -> AdminTools {
    let credentials = Credentials::new(server.uri(), "client-id", "client-secret").expect("valid credentials");
    let client = AdminApiClient::new(credentials, Duration::from_secs(5)).expect("client builds");
    AdminTools::new(Arc::new(client))
}

pub fn text(result: Result<String, ToolError>) -> String {
    into_message(result)
}
