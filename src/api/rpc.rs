//! JSON-RPC method routing shared by the HTTP and stdio transports.

use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value as J};

use crate::core::dispatch;
use crate::core::registry::CapabilityRegistry;
use crate::core::rpc::{err as rpc_err, ok as rpc_ok, RpcReq, RpcResp, ServerIdentity, PROTOCOL_VERSION};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CapabilityRegistry>,
    pub identity: ServerIdentity,
}

impl AppState {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry, identity: ServerIdentity::default() }
    }
}

fn initialize_result(identity: &ServerIdentity) -> J {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "serverInfo": identity,
        "capabilities": { "tools": {}, "resources": {}, "prompts": {} }
    })
}

/// Route one request to its terminal response. Returns `None` for
/// notifications, which must not be answered.
pub async fn handle(state: &AppState, req: RpcReq) -> Option<RpcResp> {
    if req.is_notification() {
        tracing::debug!(method = %req.method, "notification received");
        return None;
    }

    let started = Instant::now();
    metrics::counter!("rpc_requests_total", "method" => req.method.clone()).increment(1);

    let id = req.id.clone();
    let resp = match req.method.as_str() {
        "initialize" => rpc_ok(id, initialize_result(&state.identity)),
        "ping" => rpc_ok(id, json!({})),
        "shutdown" => rpc_ok(id, J::Null),
        "tools/list" | "tools.list" => {
            rpc_ok(id, json!({ "tools": state.registry.list_tools() }))
        }
        "tools/call" | "tools.call" => call_tool(state, id, &req.params).await,
        "resources/list" => {
            rpc_ok(id, json!({ "resources": state.registry.list_resources() }))
        }
        "resources/read" => read_resource(state, id, &req.params).await,
        "prompts/list" => {
            rpc_ok(id, json!({ "prompts": state.registry.list_prompts() }))
        }
        "prompts/get" => get_prompt(state, id, &req.params).await,
        _ => rpc_err(id, -32601, format!("unknown method: {}", req.method), None),
    };

    metrics::histogram!("rpc_request_latency_ms", "method" => req.method.clone())
        .record(started.elapsed().as_millis() as f64);

    Some(resp)
}

async fn call_tool(state: &AppState, id: J, params: &J) -> RpcResp {
    let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
        return rpc_err(id, -32602, "missing tool name", None);
    };
    let arguments = params.get("arguments").cloned().unwrap_or(J::Null);

    match dispatch::call_tool(&state.registry, name, &arguments).await {
        Ok(result) => rpc_ok(id, serde_json::to_value(result).unwrap_or(J::Null)),
        Err(e) => rpc_err(id, e.code(), e.to_string(), None),
    }
}

async fn read_resource(state: &AppState, id: J, params: &J) -> RpcResp {
    let Some(uri) = params.get("uri").and_then(|v| v.as_str()) else {
        return rpc_err(id, -32602, "missing resource uri", None);
    };

    match dispatch::read_resource(&state.registry, uri).await {
        Ok(result) => rpc_ok(id, serde_json::to_value(result).unwrap_or(J::Null)),
        Err(e) => rpc_err(id, e.code(), e.to_string(), None),
    }
}

async fn get_prompt(state: &AppState, id: J, params: &J) -> RpcResp {
    let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
        return rpc_err(id, -32602, "missing prompt name", None);
    };
    let arguments = params.get("arguments").cloned().unwrap_or(J::Null);

    match dispatch::get_prompt(&state.registry, name, &arguments).await {
        Ok(result) => rpc_ok(id, serde_json::to_value(result).unwrap_or(J::Null)),
        Err(e) => rpc_err(id, e.code(), e.to_string(), None),
    }
}

/// HTTP front for the router. Notifications get `202 Accepted` with no body.
pub async fn http(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(req): Json<RpcReq>,
) -> Response {
    tracing::debug!(method = %req.method, id = ?req.id, "rpc request");
    match handle(&state, req).await {
        Some(resp) => Json(resp).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
