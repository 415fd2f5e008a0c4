use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use flowgraph_config::FlowDef;
use flowgraph_runtime::RunResult;
use flowgraph_workflow::validate;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;
use crate::middleware::Authenticated;
use crate::state::AppState;

/// Build the HTTP router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/api/health", get(health))
    .route("/api/flow/execute", post(execute_flow))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

// GET /api/health (no auth required)
pub async fn health() -> Json<serde_json::Value> {
  Json(serde_json::json!({
    "status": "ok",
    "version": env!("CARGO_PKG_VERSION"),
  }))
}

// POST /api/flow/execute
//
// The body is taken as raw bytes so that unparsable JSON and a JSON document
// of the wrong shape map to different errors.
pub async fn execute_flow(
  Authenticated(principal): Authenticated,
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Result<Json<RunResult>, ApiError> {
  let value: serde_json::Value =
    serde_json::from_slice(&body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;
  let flow: FlowDef =
    serde_json::from_value(value).map_err(|e| ApiError::MalformedGraph(e.to_string()))?;

  let workflow = validate(&flow.nodes, &flow.edges, &state.limits)?;

  info!(
    principal = %principal.id,
    nodes = workflow.node_count(),
    edges = workflow.edges().len(),
    "executing flow"
  );

  // Cancelled on server shutdown, or when this handler is dropped because
  // the client went away.
  let cancel = state.shutdown.child_token();
  let _guard = cancel.clone().drop_guard();

  let result = state.runtime.invoke(&workflow, &principal.id, cancel).await?;
  Ok(Json(result))
}
