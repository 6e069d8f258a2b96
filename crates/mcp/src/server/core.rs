use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, ErrorData, ErrorData as McpError, GetPromptRequestParams, GetPromptResult, Implementation, ListPromptsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ServerHandler, service::RequestContext, tool, tool_handler, tool_router};
use serde_json::json;

use crate::server::instrument::instrument;
use crate::server::prompts::{get_prompt as get_server_prompt, list_prompts as list_server_prompts};
use crate::server::schemas::{
    EndpointRequest, EndpointWithBodyRequest, EntityByIdRequest, EntityNameRequest, SearchEntitiesRequest, SyncOperationRequest,
};
use crate::tools::AdminTools;

const SERVER_INSTRUCTIONS: &str = "Shopware 6 Admin API server.\n\
DISCOVERY:\n\
- get_available_entities lists entity names; get_entity_definition and get_entity_openapi_schema describe one entity.\n\
READING:\n\
- search_shopware_entities for filtered/sorted/paginated reads with associations; search_shopware_entity_ids when only IDs are needed.\n\
- get_shopware_entity_by_id for one record; shopware_get_request for any other GET endpoint.\n\
- Product searches without a filter return parent products only (no variants). Pass any filter to include variants.\n\
WRITING:\n\
- shopware_post_request creates, shopware_patch_request updates, shopware_delete_request deletes.\n\
- shopware_sync_operation runs one bulk upsert or delete; send multi-operation sync payloads to /_action/sync via shopware_post_request.\n\
ARGUMENTS:\n\
- JSON arguments may be objects or JSON strings. Endpoints are given without the /api prefix.";

/// MCP handler serving the Admin API tool set of one store.
#[derive(Clone)]
pub struct ShopwareMcpCore {
    tool_router: ToolRouter<Self>,
    tools: AdminTools,
}

#[tool_router]
impl ShopwareMcpCore {
    pub fn new(tools: AdminTools) -> Self {
        Self {
            tool_router: Self::tool_router(),
            tools,
        }
    }

    #[tool(
        name = "search_shopware_entities",
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Search any Shopware entity via POST /search/{entity}. Supports the full search criteria: page, limit, filter (equals, equalsAny, contains, prefix, suffix, range, not, multi), sort, post-filter, associations, aggregations, grouping, fields, total-count-mode, ids, includes. Product searches without a filter default to parentId = null (no variants); supply any filter to override."
    )]
    async fn search_shopware_entities(&self, param: Parameters<SearchEntitiesRequest>) -> Result<CallToolResult, ErrorData> {
        let request = param.0;
        Ok(instrument(
            "search_shopware_entities",
            &request,
            self.tools.search_entities(&request.entity, request.search_criteria.clone()),
        )
        .await)
    }

    #[tool(
        name = "search_shopware_entity_ids",
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Search entity IDs only via POST /search-ids/{entity}. Same criteria and product default as search_shopware_entities; fields and includes are ignored."
    )]
    async fn search_shopware_entity_ids(&self, param: Parameters<SearchEntitiesRequest>) -> Result<CallToolResult, ErrorData> {
        let request = param.0;
        Ok(instrument(
            "search_shopware_entity_ids",
            &request,
            self.tools.search_entity_ids(&request.entity, request.search_criteria.clone()),
        )
        .await)
    }

    #[tool(
        name = "get_shopware_entity_by_id",
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Fetch one entity via GET /{entity}/{id}, optionally loading associations (same format as in search criteria)."
    )]
    async fn get_shopware_entity_by_id(&self, param: Parameters<EntityByIdRequest>) -> Result<CallToolResult, ErrorData> {
        let request = param.0;
        Ok(instrument(
            "get_shopware_entity_by_id",
            &request,
            self.tools
                .get_entity_by_id(&request.entity, &request.entity_id, request.associations.clone()),
        )
        .await)
    }

    #[tool(
        name = "shopware_get_request",
        annotations(read_only_hint = true, open_world_hint = true),
        description = "GET any Admin API endpoint (without the /api prefix), for example '/product', '/_info/version' or '/_info/openapi3.json'."
    )]
    async fn shopware_get_request(&self, param: Parameters<EndpointRequest>) -> Result<CallToolResult, ErrorData> {
        let request = param.0;
        Ok(instrument(
            "shopware_get_request",
            &request,
            self.tools.raw_get(&request.endpoint, request.params.clone()),
        )
        .await)
    }

    #[tool(
        name = "shopware_post_request",
        annotations(destructive_hint = false, open_world_hint = true),
        description = "POST to any Admin API endpoint (without the /api prefix), for example '/product' to create or '/_action/sync' with a full multi-operation sync payload."
    )]
    async fn shopware_post_request(&self, param: Parameters<EndpointWithBodyRequest>) -> Result<CallToolResult, ErrorData> {
        let request = param.0;
        Ok(instrument(
            "shopware_post_request",
            &request,
            self.tools
                .raw_post(&request.endpoint, request.data.clone(), request.params.clone()),
        )
        .await)
    }

    #[tool(
        name = "shopware_patch_request",
        annotations(destructive_hint = false, open_world_hint = true),
        description = "PATCH any Admin API endpoint to update an entity, for example '/product/{id}' with the changed fields."
    )]
    async fn shopware_patch_request(&self, param: Parameters<EndpointWithBodyRequest>) -> Result<CallToolResult, ErrorData> {
        let request = param.0;
        Ok(instrument(
            "shopware_patch_request",
            &request,
            self.tools
                .raw_patch(&request.endpoint, request.data.clone(), request.params.clone()),
        )
        .await)
    }

    #[tool(
        name = "shopware_delete_request",
        annotations(destructive_hint = true, open_world_hint = true),
        description = "DELETE an entity through any Admin API endpoint, for example '/product/{id}'."
    )]
    async fn shopware_delete_request(&self, param: Parameters<EndpointRequest>) -> Result<CallToolResult, ErrorData> {
        let request = param.0;
        Ok(instrument(
            "shopware_delete_request",
            &request,
            self.tools.raw_delete(&request.endpoint, request.params.clone()),
        )
        .await)
    }

    #[tool(
        name = "get_entity_openapi_schema",
        annotations(read_only_hint = true, open_world_hint = true),
        description = "OpenAPI paths and component schemas for one entity, filtered from /_info/openapi3.json."
    )]
    async fn get_entity_openapi_schema(&self, param: Parameters<EntityNameRequest>) -> Result<CallToolResult, ErrorData> {
        let request = param.0;
        Ok(instrument(
            "get_entity_openapi_schema",
            &request,
            self.tools.get_entity_openapi_schema(&request.entity),
        )
        .await)
    }

    #[tool(
        name = "get_entity_definition",
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Entity definition (fields, types, relations) from /_info/open-api-schema.json."
    )]
    async fn get_entity_definition(&self, param: Parameters<EntityNameRequest>) -> Result<CallToolResult, ErrorData> {
        let request = param.0;
        Ok(instrument(
            "get_entity_definition",
            &request,
            self.tools.get_entity_definition(&request.entity),
        )
        .await)
    }

    #[tool(
        name = "get_available_entities",
        annotations(read_only_hint = true, open_world_hint = true),
        description = "List all entity names known to the store, sorted alphabetically."
    )]
    async fn get_available_entities(&self) -> Result<CallToolResult, ErrorData> {
        Ok(instrument("get_available_entities", &json!({}), self.tools.get_available_entities()).await)
    }

    #[tool(
        name = "shopware_sync_operation",
        annotations(destructive_hint = true, open_world_hint = true),
        description = "One bulk operation through the Sync API (POST /_action/sync). action: 'upsert' (payload = entity objects) or 'delete' (payload = ID objects or foreign key pairs). Optional indexing_behavior ('use-queue-indexing' or 'disable-indexing') and skip_trigger_flow for large imports. The request is transactional."
    )]
    async fn shopware_sync_operation(&self, param: Parameters<SyncOperationRequest>) -> Result<CallToolResult, ErrorData> {
        let request = param.0;
        Ok(instrument(
            "shopware_sync_operation",
            &request,
            self.tools.sync_operation(
                &request.entity,
                &request.action,
                request.payload.clone(),
                request.operation_key.clone(),
                request.indexing_behavior.as_deref(),
                request.skip_trigger_flow,
            ),
        )
        .await)
    }
}

#[tool_handler]
impl ServerHandler for ShopwareMcpCore {
    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(list_server_prompts()))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<GetPromptResult, McpError>> + Send + '_ {
        async move { get_server_prompt(&request.name, &self.tools).await }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().enable_prompts().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "mcp-shopware-api".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Shopware Admin API".to_string()),
                ..Default::default()
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }
}
