use axum::{
    routing::{get, post},
    Router,
};

use crate::api::rpc::{self, AppState};

/// `/healthz` for liveness plus the JSON-RPC endpoint at `/mcp`.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/mcp", post(rpc::http))
        .with_state(state)
}
