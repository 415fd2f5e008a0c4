//! Runtime error types.

use flowgraph_workflow::ValidationError;

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
  /// Execution was cancelled before every node was dispatched.
  #[error("execution cancelled")]
  Cancelled,

  /// The flow failed validation; no node executed.
  #[error(transparent)]
  Validation(#[from] ValidationError),
}

/// A node failed at run time. Recorded on the node's result and never
/// propagated out of the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
  /// The node's `config` does not have the shape its kind expects.
  #[error("malformed {kind} config: {message}")]
  MalformedConfig { kind: &'static str, message: String },

  /// A condition named an operator the engine does not implement.
  #[error("unsupported condition operator '{0}'")]
  UnknownOperator(String),

  /// The node did not finish within the per-node timeout.
  #[error("node timed out after {timeout_ms}ms")]
  Timeout { timeout_ms: u64 },
}

impl NodeError {
  pub(crate) fn malformed(kind: &'static str, message: impl Into<String>) -> Self {
    Self::MalformedConfig {
      kind,
      message: message.into(),
    }
  }
}
