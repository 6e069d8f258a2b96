//! Model Context Protocol server for the Shopware 6 Admin API.
//!
//! This crate exposes Admin API operations as MCP tools plus one composite
//! prompt. It is split into:
//!
//! - [`tools`]: the operations themselves, independent of MCP
//! - [`server`]: the rmcp handler, prompt wiring and the stdio/HTTP hosts

pub mod server;
pub mod tools;

pub use server::{McpHttpServer, RunningMcpHttpServer, ShopwareMcpCore, resolve_bind_address, serve_stdio};
pub use tools::{AdminTools, InputError, JsonArgument, ToolError, into_message};
