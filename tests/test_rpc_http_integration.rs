use axum::body::Body;
use http_body_util::BodyExt; // for .collect
use hyper::Request;
use serde_json::{json, Value};
use tower::ServiceExt; // for .oneshot

use sidekick_mcp::api::rpc::AppState;
use sidekick_mcp::infra::boot::build_registry;
use sidekick_mcp::infra::config::AppConfig;
use sidekick_mcp::infra::http_app::build_app;

fn app() -> axum::Router {
    let registry = build_registry(&AppConfig::default()).expect("registry builds");
    build_app(AppState::new(registry))
}

fn rpc_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn rpc(app: &axum::Router, body: Value) -> Value {
    let resp = app.clone().oneshot(rpc_request(&body)).await.unwrap();
    assert!(resp.status().is_success(), "status {}", resp.status());
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_answers_ok() {
    let resp = app()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(resp.status().is_success());
}

#[tokio::test]
async fn initialize_advertises_the_three_kinds() {
    let v = rpc(
        &app(),
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
    )
    .await;
    assert_eq!(v["result"]["serverInfo"]["name"], "sidekick-mcp");
    assert!(v["result"]["capabilities"]["tools"].is_object());
    assert!(v["result"]["capabilities"]["resources"].is_object());
    assert!(v["result"]["capabilities"]["prompts"].is_object());
}

#[tokio::test]
async fn tools_list_names_every_tool_with_a_schema() {
    let v = rpc(&app(), json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
    let tools = v["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["calculator", "greeting", "imagine", "time"]);
    for tool in tools {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn greeting_mina_in_english_is_word_perfect() {
    let v = rpc(
        &app(),
        json!({
            "jsonrpc": "2.0", "id": 3, "method": "tools/call",
            "params": {"name": "greeting", "arguments": {"name": "Mina", "language": "english"}}
        }),
    )
    .await;
    let result = &v["result"];
    assert_eq!(result["content"][0]["type"], "text");
    assert_eq!(result["content"][0]["text"], "Hello, Mina! Nice to meet you!");
    assert!(result.get("isError").is_none());
}

#[tokio::test]
async fn division_by_zero_is_an_is_error_result_not_a_protocol_error() {
    let v = rpc(
        &app(),
        json!({
            "jsonrpc": "2.0", "id": 4, "method": "tools/call",
            "params": {"name": "calculator", "arguments": {"num1": 10, "num2": 0, "operator": "/"}}
        }),
    )
    .await;
    assert!(v.get("error").is_none());
    let result = &v["result"];
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("division by zero"));
}

#[tokio::test]
async fn six_times_seven_renders_forty_two() {
    let v = rpc(
        &app(),
        json!({
            "jsonrpc": "2.0", "id": 5, "method": "tools/call",
            "params": {"name": "calculator", "arguments": {"num1": 6, "num2": 7, "operator": "*"}}
        }),
    )
    .await;
    assert!(v["result"]["content"][0]["text"].as_str().unwrap().contains("42"));
    assert!(v["result"].get("isError").is_none());
}

#[tokio::test]
async fn an_invalid_timezone_is_named_in_the_failure_text() {
    let v = rpc(
        &app(),
        json!({
            "jsonrpc": "2.0", "id": 6, "method": "tools/call",
            "params": {"name": "time", "arguments": {"timezone": "Not/AZone"}}
        }),
    )
    .await;
    let result = &v["result"];
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"].as_str().unwrap().contains("Not/AZone"));
}

#[tokio::test]
async fn arguments_outside_the_declared_enum_are_rejected_before_execution() {
    let v = rpc(
        &app(),
        json!({
            "jsonrpc": "2.0", "id": 7, "method": "tools/call",
            "params": {"name": "calculator", "arguments": {"num1": 1, "num2": 2, "operator": "%"}}
        }),
    )
    .await;
    assert_eq!(v["error"]["code"], -32602);
    assert!(v["error"]["message"].as_str().unwrap().contains("operator"));
}

#[tokio::test]
async fn unknown_tool_is_a_resolution_error_and_the_server_keeps_serving() {
    let app = app();

    let v = rpc(
        &app,
        json!({
            "jsonrpc": "2.0", "id": 8, "method": "tools/call",
            "params": {"name": "does_not_exist", "arguments": {}}
        }),
    )
    .await;
    assert_eq!(v["error"]["code"], -32602);
    assert!(v["error"]["message"].as_str().unwrap().contains("does_not_exist"));

    // Same router instance still answers ordinary requests.
    let v = rpc(
        &app,
        json!({
            "jsonrpc": "2.0", "id": 9, "method": "tools/call",
            "params": {"name": "greeting", "arguments": {"name": "Mina"}}
        }),
    )
    .await;
    assert_eq!(v["result"]["content"][0]["text"], "Hello, Mina! Nice to meet you!");
}

#[tokio::test]
async fn the_self_description_resource_lists_every_registration_by_kind() {
    let app = app();

    let listing = rpc(&app, json!({"jsonrpc": "2.0", "id": 10, "method": "resources/list"})).await;
    assert_eq!(listing["result"]["resources"][0]["uri"], "info://server");

    let v = rpc(
        &app,
        json!({
            "jsonrpc": "2.0", "id": 11, "method": "resources/read",
            "params": {"uri": "info://server"}
        }),
    )
    .await;
    let contents = &v["result"]["contents"][0];
    assert_eq!(contents["mimeType"], "application/json");
    let snapshot: Value = serde_json::from_str(contents["text"].as_str().unwrap()).unwrap();
    assert_eq!(
        snapshot["capabilities"]["tools"],
        json!(["calculator", "greeting", "imagine", "time"])
    );
    assert_eq!(snapshot["capabilities"]["resources"], json!(["info://server"]));
    assert_eq!(snapshot["capabilities"]["prompts"], json!(["friendly_greeting"]));
}

#[tokio::test]
async fn prompts_are_listed_and_rendered() {
    let app = app();

    let listing = rpc(&app, json!({"jsonrpc": "2.0", "id": 12, "method": "prompts/list"})).await;
    assert_eq!(listing["result"]["prompts"][0]["name"], "friendly_greeting");

    let v = rpc(
        &app,
        json!({
            "jsonrpc": "2.0", "id": 13, "method": "prompts/get",
            "params": {"name": "friendly_greeting", "arguments": {"name": "Mina", "language": "korean"}}
        }),
    )
    .await;
    let message = &v["result"]["messages"][0];
    assert_eq!(message["role"], "user");
    let text = message["content"]["text"].as_str().unwrap();
    assert!(text.contains("Mina"));
    assert!(text.contains("korean"));
}

#[tokio::test]
async fn an_unconfigured_image_renderer_is_a_domain_failure() {
    let v = rpc(
        &app(),
        json!({
            "jsonrpc": "2.0", "id": 14, "method": "tools/call",
            "params": {"name": "imagine", "arguments": {"prompt": "a lighthouse"}}
        }),
    )
    .await;
    let result = &v["result"];
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"].as_str().unwrap().contains("IMAGINE_BASE_URL"));
}

#[tokio::test]
async fn unknown_method_returns_method_not_found() {
    let v = rpc(&app(), json!({"jsonrpc": "2.0", "id": 15, "method": "nope"})).await;
    assert_eq!(v["error"]["code"], -32601);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from("{ not-json }"))
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn notifications_get_accepted_with_no_body() {
    let req = rpc_request(&json!({
        "jsonrpc": "2.0", "method": "notifications/initialized", "params": {}
    }));
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), hyper::StatusCode::ACCEPTED);
}
