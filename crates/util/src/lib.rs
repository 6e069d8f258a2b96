//! # Shopware MCP Utilities
//!
//! Small helpers shared by the Admin API client and the MCP server:
//!
//! - **HTTP**: strict JSON parsing of response bodies and query flattening
//! - **Text processing**: secret redaction and bounded previews for logs
//! - **Naming**: the entity spellings used across the Admin API documents

pub mod http;
pub mod naming;
pub mod text_processing;

pub use http::{JsonParseError, build_query_pairs, parse_response_json, parse_response_json_strict};
pub use text_processing::*;
