mod core;
mod http;
mod instrument;
mod prompts;
mod schemas;
mod stdio;

pub use core::ShopwareMcpCore;
pub use http::{MCP_HTTP_PATH, McpHttpServer, RunningMcpHttpServer, resolve_bind_address};
pub use prompts::{READY_TO_SHIP_ORDERS, get_prompt, list_prompts};
pub use schemas::{
    EndpointRequest, EndpointWithBodyRequest, EntityByIdRequest, EntityNameRequest, SearchEntitiesRequest, SyncOperationRequest,
};
pub use stdio::serve_stdio;
