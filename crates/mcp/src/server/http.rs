//! Streamable HTTP hosting of the MCP server on a loopback address.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use axum::Router;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::server::core::ShopwareMcpCore;
use crate::tools::AdminTools;

/// Path the MCP endpoint is mounted at.
pub const MCP_HTTP_PATH: &str = "/mcp";

/// Host configuration for the MCP HTTP server.
#[derive(Debug, Clone)]
pub struct McpHttpServer {
    bind_address: SocketAddr,
    tools: AdminTools,
}

impl McpHttpServer {
    /// Create a server for `tools` bound to a loopback `bind_address`.
    pub fn new(bind_address: SocketAddr, tools: AdminTools) -> Self {
        Self { bind_address, tools }
    }

    /// Bind the listener and start serving. Every session shares the same
    /// API client and therefore the same token cache.
    pub async fn start(self) -> Result<RunningMcpHttpServer> {
        let cancellation_token = CancellationToken::new();
        let session_manager = Arc::new(LocalSessionManager::default());

        let tools = self.tools.clone();
        let service: StreamableHttpService<ShopwareMcpCore, LocalSessionManager> = StreamableHttpService::new(
            move || Ok(ShopwareMcpCore::new(tools.clone())),
            session_manager,
            StreamableHttpServerConfig {
                stateful_mode: true,
                sse_keep_alive: None,
                cancellation_token: cancellation_token.child_token(),
                ..Default::default()
            },
        );

        let router = Router::new().nest_service(MCP_HTTP_PATH, service);
        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .with_context(|| format!("bind MCP HTTP listener on {}", self.bind_address))?;
        let bound_address = listener.local_addr()?;
        info!(address = %bound_address, path = MCP_HTTP_PATH, "MCP HTTP server listening");

        let server_handle = tokio::spawn({
            let shutdown = cancellation_token.child_token();
            async move {
                let _ = axum::serve(listener, router)
                    .with_graceful_shutdown(async move {
                        shutdown.cancelled().await;
                    })
                    .await;
            }
        });

        Ok(RunningMcpHttpServer {
            bind_address: bound_address,
            cancellation_token,
            server_handle,
        })
    }
}

/// Runtime handle for a running MCP HTTP server.
#[derive(Debug)]
pub struct RunningMcpHttpServer {
    bind_address: SocketAddr,
    cancellation_token: CancellationToken,
    server_handle: JoinHandle<()>,
}

impl RunningMcpHttpServer {
    pub fn bound_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Stop accepting connections and wait for the server task to finish.
    pub async fn stop(self) -> Result<()> {
        self.cancellation_token.cancel();
        self.server_handle
            .await
            .map_err(|error| anyhow!("MCP HTTP server task failed: {error}"))?;
        info!("MCP HTTP server stopped");
        Ok(())
    }
}

/// Parse a bind address and require it to be loopback.
pub fn resolve_bind_address(bind_address: &str) -> Result<SocketAddr> {
    let parsed: SocketAddr = bind_address
        .parse()
        .map_err(|error| anyhow!("invalid MCP HTTP bind address '{bind_address}': {error}"))?;
    if !is_loopback(parsed.ip()) {
        return Err(anyhow!("MCP HTTP server must bind to a loopback address, got '{bind_address}'"));
    }
    Ok(parsed)
}

fn is_loopback(address: IpAddr) -> bool {
    match address {
        IpAddr::V4(ip) => ip.is_loopback(),
        IpAddr::V6(ip) => ip.is_loopback(),
    }
}
