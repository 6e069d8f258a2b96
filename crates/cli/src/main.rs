use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shopware_api::{AdminApiClient, Credentials};
use shopware_mcp::{AdminTools, McpHttpServer, resolve_bind_address, serve_stdio};
use tracing::{Subscriber, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_DEBUG_LOG: &str = "/tmp/mcp-shopware-debug.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

/// MCP server for the Shopware 6 Admin API.
#[derive(Debug, Parser)]
#[command(name = "shopware-mcp", version, about)]
struct Args {
    /// Base URL of the store, for example https://shop.example.com
    #[arg(long, env = "STORE_URL")]
    store_url: Option<String>,

    /// Integration access key ID
    #[arg(long, env = "API_KEY")]
    api_key: Option<String>,

    /// Integration secret access key
    #[arg(long, env = "API_SECRET", hide_env_values = true)]
    api_secret: Option<String>,

    #[arg(long, value_enum, env = "MCP_TRANSPORT", default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Loopback address for the HTTP transport
    #[arg(long, env = "MCP_HTTP_BIND", default_value = "127.0.0.1:8765")]
    bind: String,

    /// Timeout for each Admin API request, in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Append debug logs to /tmp/mcp-shopware-debug.log unless --log-file is set.
    /// `MCP_DEBUG` enables this too, but only when it is `true` or `1`.
    #[arg(long)]
    debug: bool,
}

impl Args {
    /// `mcp_debug` is the raw `MCP_DEBUG` value.
    fn debug_log_path(&self, mcp_debug: Option<&str>) -> Option<PathBuf> {
        let enabled = self.debug || mcp_debug.is_some_and(debug_env_enabled);
        self.log_file
            .clone()
            .or_else(|| enabled.then(|| PathBuf::from(DEFAULT_DEBUG_LOG)))
    }
}

fn debug_env_enabled(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let mcp_debug = std::env::var("MCP_DEBUG").ok();
    init_tracing(args.debug_log_path(mcp_debug.as_deref()).as_deref())?;

    let credentials = Credentials::resolve(args.store_url.clone(), args.api_key.clone(), args.api_secret.clone())?;
    let client = AdminApiClient::new(credentials, Duration::from_secs(args.request_timeout_secs))?;
    info!(store = client.base_url(), transport = ?args.transport, "starting Shopware MCP server");
    let tools = AdminTools::new(Arc::new(client));

    match args.transport {
        Transport::Stdio => serve_stdio(tools).await,
        Transport::Http => run_http(&args.bind, tools).await,
    }
}

async fn run_http(bind: &str, tools: AdminTools) -> Result<()> {
    let bind_address = resolve_bind_address(bind)?;
    let server = McpHttpServer::new(bind_address, tools).start().await?;
    info!(address = %server.bound_address(), "press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.context("wait for Ctrl-C")?;
    info!("shutting down MCP HTTP server");
    server.stop().await
}

/// Logs go to stderr; stdout is reserved for the stdio transport.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let _ = subscriber(log_file)?.try_init();
    Ok(())
}

/// Stderr follows `RUST_LOG` (default `info`). The log file always records
/// debug level, independent of `RUST_LOG`.
fn subscriber(log_file: Option<&Path>) -> Result<impl Subscriber + Send + Sync + use<>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);
    let file_layer = log_file.map(|path| debug_file_layer(path)).transpose()?;

    Ok(tracing_subscriber::registry().with(stderr_layer).with(file_layer))
}

fn debug_file_layer<S>(path: &Path) -> Result<impl Layer<S> + use<S>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    Ok(tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::DEBUG))
}
