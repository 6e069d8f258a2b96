use serde_json::{Map, Value, json};
use shopware_api::{Method, RequestOptions};
use shopware_util::naming::{entity_names_match, to_kebab_entity, to_pascal_entity};

use super::{AdminTools, ToolError, render_json_pretty, status_message};

const OPENAPI_DOCUMENT: &str = "/_info/openapi3.json";
const ENTITY_DEFINITIONS_DOCUMENT: &str = "/_info/open-api-schema.json";

impl AdminTools {
    /// Paths and component schemas of the OpenAPI document that concern `entity`.
    pub async fn get_entity_openapi_schema(&self, entity: &str) -> Result<String, ToolError> {
        let context = format!("Error getting OpenAPI schema for entity '{entity}'");
        let document = self
            .fetch_document(OPENAPI_DOCUMENT, &context, "Failed to fetch OpenAPI schema")
            .await?;

        let (paths, schemas) = filter_openapi_document(&document, entity);
        if paths.is_empty() && schemas.is_empty() {
            return Ok(format!(
                "No OpenAPI schema found for entity '{entity}'. Available entities can be found using get_available_entities tool."
            ));
        }

        let result = json!({
            "entity": entity,
            "paths": paths,
            "schemas": schemas,
        });
        Ok(format!("OpenAPI schema for entity '{entity}': {}", render_json_pretty(&result)))
    }

    /// The DAL definition of `entity` from the entity-definition document.
    pub async fn get_entity_definition(&self, entity: &str) -> Result<String, ToolError> {
        let context = format!("Error getting entity definition for entity '{entity}'");
        let document = self
            .fetch_document(ENTITY_DEFINITIONS_DOCUMENT, &context, "Failed to fetch entity definitions")
            .await?;

        match find_entity_definition(&document, entity) {
            Some(DefinitionMatch::Exact(definition)) => {
                let result = json!({"entity": entity, "definition": definition});
                Ok(format!("Entity definition for '{entity}': {}", render_json_pretty(&result)))
            }
            Some(DefinitionMatch::Fallback { key, definition }) => {
                let result = json!({"entity": entity, "definition": definition, "matched_key": key});
                Ok(format!(
                    "Entity definition for '{entity}' (matched as '{key}'): {}",
                    render_json_pretty(&result)
                ))
            }
            None => Ok(format!(
                "Entity definition not found for '{entity}'. Available entities can be found using get_available_entities tool."
            )),
        }
    }

    /// Every entity name of the entity-definition document, sorted.
    pub async fn get_available_entities(&self) -> Result<String, ToolError> {
        let document = self
            .fetch_document(
                ENTITY_DEFINITIONS_DOCUMENT,
                "Error getting available entities",
                "Failed to fetch entity definitions",
            )
            .await?;

        let entities = sorted_entity_names(&document);
        let result = json!({
            "total_entities": entities.len(),
            "entities": entities,
        });
        Ok(format!(
            "Available entities ({} total): {}",
            entities.len(),
            render_json_pretty(&result)
        ))
    }

    async fn fetch_document(&self, endpoint: &str, context: &str, failure: &str) -> Result<Value, ToolError> {
        let response = self
            .client()
            .authenticated_request(Method::GET, endpoint, RequestOptions::default())
            .await
            .map_err(ToolError::request(context))?;

        if response.status_code() != 200 {
            return Err(ToolError::upstream(
                response.status_code(),
                format!("{failure} with {}", status_message(&response)),
            ));
        }

        response.json().map_err(ToolError::response(context))
    }
}

/// Select the OpenAPI paths and component schemas related to `entity`.
///
/// A path matches when it contains `/{kebab}` or `/{entity}`, or when its
/// lowercased form contains either spelling. A schema matches when its
/// lowercased name equals the pascal, kebab or raw spelling. The pascal
/// derivation is a heuristic and misses suffixed names like `ProductJsonApi`.
fn filter_openapi_document(document: &Value, entity: &str) -> (Map<String, Value>, Map<String, Value>) {
    let kebab = to_kebab_entity(entity);
    let pascal = to_pascal_entity(entity).to_lowercase();
    let raw_lower = entity.to_lowercase();

    let paths = document
        .get("paths")
        .and_then(Value::as_object)
        .map(|paths| {
            paths
                .iter()
                .filter(|(path, _)| {
                    let lowered = path.to_lowercase();
                    path.contains(&format!("/{kebab}"))
                        || path.contains(&format!("/{entity}"))
                        || lowered.contains(&kebab)
                        || lowered.contains(entity)
                })
                .map(|(path, value)| (path.clone(), value.clone()))
                .collect::<Map<String, Value>>()
        })
        .unwrap_or_default();

    let schemas = document
        .pointer("/components/schemas")
        .and_then(Value::as_object)
        .map(|schemas| {
            schemas
                .iter()
                .filter(|(name, _)| {
                    let lowered = name.to_lowercase();
                    lowered == pascal || lowered == kebab || lowered == raw_lower
                })
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect::<Map<String, Value>>()
        })
        .unwrap_or_default();

    (paths, schemas)
}

#[derive(Debug, PartialEq)]
enum DefinitionMatch<'a> {
    Exact(&'a Value),
    Fallback { key: &'a str, definition: &'a Value },
}

/// Exact kebab-case lookup first, then a scan that ignores case and `_`/`-`.
fn find_entity_definition<'a>(document: &'a Value, entity: &str) -> Option<DefinitionMatch<'a>> {
    let definitions = document.as_object()?;
    if let Some(definition) = definitions.get(&to_kebab_entity(entity)) {
        return Some(DefinitionMatch::Exact(definition));
    }

    definitions
        .iter()
        .find(|(key, _)| entity_names_match(key, entity))
        .map(|(key, definition)| DefinitionMatch::Fallback {
            key: key.as_str(),
            definition,
        })
}

fn sorted_entity_names(document: &Value) -> Vec<String> {
    let mut names = document
        .as_object()
        .map(|definitions| definitions.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    names.sort();
    names
}
