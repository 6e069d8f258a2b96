//! Shopware Admin API client.
//!
//! This crate provides an authenticated client for a single store's Admin
//! API. It focuses on:
//!
//! - Validating the store URL and holding the integration credentials
//! - Fetching, caching and lazily refreshing OAuth2 client-credentials tokens
//! - Issuing requests under `{store_url}/api` and logging their outcome
//!
//! The primary entry point is [`AdminApiClient`]. Build [`Credentials`] first,
//! then issue requests with [`AdminApiClient::authenticated_request`].
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use shopware_api::{AdminApiClient, Credentials, RequestOptions};
//!
//! async fn run() -> anyhow::Result<()> {
//!     let credentials = Credentials::new("https://shop.example.com", "SWIA...", "secret")?;
//!     let client = AdminApiClient::new(credentials, Duration::from_secs(30))?;
//!     let response = client
//!         .authenticated_request(reqwest::Method::GET, "/product", RequestOptions::default())
//!         .await?;
//!     println!("status: {}", response.status);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod response;
mod token;

pub use client::{AdminApiClient, RequestOptions};
pub use config::Credentials;
pub use error::{ApiError, AuthError, ConfigError};
pub use reqwest::{Method, StatusCode};
pub use response::{ApiResponse, collection_summary};
