use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::JsonArgument;

/// Parameters for entity searches.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchEntitiesRequest {
    #[schemars(description = "Entity name, for example 'product', 'order', 'customer' or 'product-manufacturer'.")]
    pub entity: String,
    /// Shopware search criteria.
    #[schemars(
        description = "Optional search criteria as object or JSON string: page, limit, filter, sort, post-filter, associations, aggregations, grouping, fields, total-count-mode, ids, includes."
    )]
    pub search_criteria: Option<JsonArgument>,
}

/// Parameters for a detail lookup.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EntityByIdRequest {
    #[schemars(description = "Entity name, for example 'product'.")]
    pub entity: String,
    #[schemars(description = "ID of the entity to fetch.")]
    pub entity_id: String,
    #[schemars(description = "Optional associations to load, object or JSON string, same format as in search criteria.")]
    pub associations: Option<JsonArgument>,
}

/// Parameters for GET and DELETE passthrough calls.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EndpointRequest {
    #[schemars(description = "Endpoint without the /api prefix, for example '/product' or '/_info/version'.")]
    pub endpoint: String,
    #[schemars(description = "Optional query parameters, object or JSON string.")]
    pub params: Option<JsonArgument>,
}

/// Parameters for POST and PATCH passthrough calls.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EndpointWithBodyRequest {
    #[schemars(description = "Endpoint without the /api prefix, for example '/product' or '/product/{id}'.")]
    pub endpoint: String,
    #[schemars(description = "Optional request body, object or JSON string.")]
    pub data: Option<JsonArgument>,
    #[schemars(description = "Optional query parameters, object or JSON string.")]
    pub params: Option<JsonArgument>,
}

/// Parameters for schema introspection.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityNameRequest {
    #[schemars(description = "Entity name, for example 'product', 'order' or 'customer'.")]
    pub entity: String,
}

/// Parameters for a single Sync API operation.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SyncOperationRequest {
    #[schemars(description = "Entity name, for example 'product', 'category' or 'product_category'.")]
    pub entity: String,
    #[schemars(description = "'upsert' to create or update, 'delete' to remove.")]
    pub action: String,
    /// Records to write or keys to delete.
    #[schemars(
        description = "List (or JSON string of a list). Upsert: entity objects. Delete: ID objects such as {\"id\": \"...\"} or foreign key pairs for mapping entities."
    )]
    pub payload: JsonArgument,
    #[schemars(description = "Optional operation key, defaults to '<action>-<entity>'.")]
    pub operation_key: Option<String>,
    #[schemars(
        description = "Optional indexing-behavior header: 'use-queue-indexing' (async) or 'disable-indexing'. Omit for synchronous indexing."
    )]
    pub indexing_behavior: Option<String>,
    #[schemars(description = "Skip business flows (sw-skip-trigger-flow header).")]
    #[serde(default)]
    pub skip_trigger_flow: bool,
}
