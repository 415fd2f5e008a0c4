//! Mapping of request failures to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flowgraph_runtime::RuntimeError;
use flowgraph_workflow::ValidationError;
use serde_json::json;

/// Code reported when the body is JSON but not a `{nodes, edges}` document.
pub const MALFORMED_GRAPH: &str = "MALFORMED_GRAPH";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  /// The body is not JSON at all.
  #[error("invalid JSON body: {0}")]
  InvalidJson(String),

  /// The body is JSON but does not have the shape of a flow.
  #[error("malformed flow: {0}")]
  MalformedGraph(String),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("run cancelled")]
  Cancelled,
}

impl From<RuntimeError> for ApiError {
  fn from(err: RuntimeError) -> Self {
    match err {
      RuntimeError::Cancelled => Self::Cancelled,
      RuntimeError::Validation(e) => Self::Validation(e),
    }
  }
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
      Self::InvalidJson(_) | Self::MalformedGraph(_) | Self::Validation(_) => {
        StatusCode::BAD_REQUEST
      }
      Self::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    }
  }

  fn body(&self) -> serde_json::Value {
    match self {
      Self::Unauthorized => json!({ "error": "Unauthorized" }),
      Self::InvalidJson(_) => json!({ "error": "Invalid JSON body" }),
      Self::MalformedGraph(message) => json!({
        "error": "Validation failed",
        "details": { "code": MALFORMED_GRAPH, "message": message },
      }),
      // Cycles carry their message at the top level so that it reads
      // "... contains a cycle ..." without digging into details.
      Self::Validation(e) if e.is_cycle() => json!({
        "error": e.to_string(),
        "code": e.code(),
      }),
      Self::Validation(e) => json!({
        "error": "Validation failed",
        "details": { "code": e.code(), "message": e.to_string() },
      }),
      Self::Cancelled => json!({ "error": "Run cancelled" }),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status(), Json(self.body())).into_response()
  }
}
