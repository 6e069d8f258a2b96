use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Startup configuration problems. Reported once, before any request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid STORE_URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failure while obtaining an OAuth2 access token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token request rejected with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("token response is invalid: {0}")]
    InvalidResponse(String),
}

/// Errors surfaced by [`crate::AdminApiClient::authenticated_request`].
///
/// Non-success HTTP statuses are not errors here; they come back as a normal
/// [`crate::ApiResponse`] for the caller to interpret.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
}
