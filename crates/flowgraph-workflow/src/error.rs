use thiserror::Error;

/// Structural problems that make a flow graph unexecutable.
///
/// Each variant maps to a stable machine-readable [`code`](Self::code) so
/// callers can render a precise message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("flow graph has no nodes")]
  EmptyGraph,

  #[error("flow graph too large: {count} {what} exceeds the limit of {limit}")]
  GraphTooLarge {
    what: &'static str,
    count: usize,
    limit: usize,
  },

  #[error("invalid node id at index {index}: {reason}")]
  InvalidNodeId { index: usize, reason: String },

  #[error("node '{node_id}' has unknown type '{node_type}'")]
  UnknownNodeType { node_id: String, node_type: String },

  #[error("edge '{edge_id}' references unknown node '{node_id}'")]
  DanglingEdge { edge_id: String, node_id: String },

  #[error("flow graph contains a cycle: {}", .path.join(" -> "))]
  CycleDetected { path: Vec<String> },
}

impl ValidationError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::EmptyGraph => "EMPTY_GRAPH",
      Self::GraphTooLarge { .. } => "GRAPH_TOO_LARGE",
      Self::InvalidNodeId { .. } => "INVALID_NODE_ID",
      Self::UnknownNodeType { .. } => "UNKNOWN_NODE_TYPE",
      Self::DanglingEdge { .. } => "DANGLING_EDGE",
      Self::CycleDetected { .. } => "CYCLE_DETECTED",
    }
  }

  pub fn is_cycle(&self) -> bool {
    matches!(self, Self::CycleDetected { .. })
  }
}
