use anyhow::{Context, Result};
use rmcp::ServiceExt;
use tracing::info;

use crate::server::core::ShopwareMcpCore;
use crate::tools::AdminTools;

/// Serve the MCP protocol over stdin/stdout until the client disconnects.
///
/// Stdout carries protocol frames only; logging must go to stderr.
pub async fn serve_stdio(tools: AdminTools) -> Result<()> {
    info!("serving MCP over stdio");
    let service = ShopwareMcpCore::new(tools)
        .serve(rmcp::transport::stdio())
        .await
        .context("start MCP stdio service")?;
    service.waiting().await.context("MCP stdio service failed")?;
    info!("MCP stdio client disconnected");
    Ok(())
}
