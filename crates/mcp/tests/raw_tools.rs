mod common;

use common::{idle_store, store, text, tools_for};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn get_prefixes_endpoint_and_forwards_params() {
    let server = store().await;
    Mock::given(method("GET"))
        .and(path("/api/product"))
        .and(query_param("limit", "10"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&server);
    let message = text(tools.raw_get("product", Some("{\"limit\": 10, \"page\": 1}".into())).await);

    assert!(message.starts_with("GET request successful for endpoint '/product'. Result: "));
}

#[tokio::test]
async fn get_failure_reports_status() {
    let server = store().await;
    Mock::given(method("GET"))
        .and(path("/api/_info/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let tools = tools_for(&server);
    let message = text(tools.raw_get("/_info/missing", None).await);

    assert_eq!(message, "GET request failed for endpoint '/_info/missing' with status 404: Not Found");
}

#[tokio::test]
async fn post_accepts_created_status() {
    let server = store().await;
    Mock::given(method("POST"))
        .and(path("/api/tag"))
        .and(body_json(json!({"name": "summer"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "t1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&server);
    let message = text(tools.raw_post("/tag", Some(json!({"name": "summer"}).into()), None).await);

    assert!(message.starts_with("POST request successful for endpoint '/tag'. Result: "));
    assert!(message.contains("\"t1\""));
}

#[tokio::test]
async fn patch_without_content_is_reported_distinctly() {
    let server = store().await;
    Mock::given(method("PATCH"))
        .and(path("/api/product/p1"))
        .and(body_json(json!({"stock": 5})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&server);
    let message = text(tools.raw_patch("/product/p1", Some("{\"stock\": 5}".into()), None).await);

    assert_eq!(
        message,
        "PATCH request successful for endpoint '/product/p1'. Entity updated (no content returned)."
    );
}

#[tokio::test]
async fn patch_with_body_returns_result() {
    let server = store().await;
    Mock::given(method("PATCH"))
        .and(path("/api/product/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "p1", "stock": 5}})))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&server);
    let message = text(tools.raw_patch("/product/p1", Some(json!({"stock": 5}).into()), None).await);

    assert!(message.starts_with("PATCH request successful for endpoint '/product/p1'. Result: "));
    assert!(message.contains("\"stock\":5"));
}

#[tokio::test]
async fn patch_failure_contains_status_code() {
    let server = store().await;
    Mock::given(method("PATCH"))
        .and(path("/api/product/p1"))
        .respond_with(ResponseTemplate::new(400).set_body_string("{\"errors\":[{\"detail\":\"stock must be int\"}]}"))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&server);
    let message = text(tools.raw_patch("/product/p1", Some(json!({"stock": "x"}).into()), None).await);

    assert!(message.starts_with("PATCH request failed for endpoint '/product/p1' with status 400:"));
    assert!(message.contains("stock must be int"));
}

#[tokio::test]
async fn delete_without_content_reports_deletion() {
    let server = store().await;
    Mock::given(method("DELETE"))
        .and(path("/api/product/p1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&server);
    let message = text(tools.raw_delete("product/p1", None).await);

    assert_eq!(
        message,
        "DELETE request successful for endpoint '/product/p1'. Entity deleted successfully."
    );
}

#[tokio::test]
async fn malformed_body_or_params_are_rejected_locally() {
    let server = idle_store().await;
    let tools = tools_for(&server);

    let message = text(tools.raw_post("/product", Some("{\"name\":".into()), None).await);
    assert!(message.starts_with("Invalid JSON in data:"));

    let message = text(tools.raw_delete("/product/p1", Some("force=true".into())).await);
    assert!(message.starts_with("Invalid JSON in params:"));
}

#[tokio::test]
async fn delete_with_empty_ok_body_is_not_reported_as_no_content() {
    let server = store().await;
    Mock::given(method("DELETE"))
        .and(path("/api/product/p2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&server);
    let message = text(tools.raw_delete("/product/p2", None).await);

    assert_eq!(message, "DELETE request successful for endpoint '/product/p2'. Result: null");
}
