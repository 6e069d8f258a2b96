mod common;

use common::{store, text, tools_for};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn consecutive_tools_share_one_token() {
    // `store()` expects exactly one token request.
    let server = store().await;
    Mock::given(method("GET"))
        .and(path("/api/_info/open-api-schema.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"product": {}})))
        .expect(2)
        .mount(&server)
        .await;

    let tools = tools_for(&server);
    let first = text(tools.get_available_entities().await);
    let second = text(tools.get_entity_definition("product").await);

    assert!(first.starts_with("Available entities (1 total)"));
    assert!(second.starts_with("Entity definition for 'product': "));
    assert!(tools.client().has_cached_token().await);
}

#[tokio::test]
async fn rejected_credentials_surface_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"errors": [{"title": "Unauthorized"}]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/search/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let tools = tools_for(&server);
    let message = text(tools.search_entities("product", None).await);

    assert!(message.starts_with("Error searching entity 'product': authentication failed: token request rejected with status 401"));
    assert!(!tools.client().has_cached_token().await);
}
