//! Execution result types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
  Success,
  Error,
  Skipped,
}

/// Outcome of a single node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResult {
  pub node_id: String,
  pub status: NodeStatus,
  /// Node output. `null` for errored and skipped nodes.
  pub output: serde_json::Value,
  pub duration_ms: u64,
  /// Why the node errored or was skipped.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
  /// True for every run that got past validation, even if nodes failed.
  pub success: bool,
  pub execution_id: String,
  /// One entry per node, in execution order.
  pub results: Vec<NodeResult>,
  pub total_duration_ms: u64,
}

impl RunResult {
  /// Find the result for a node.
  pub fn get(&self, node_id: &str) -> Option<&NodeResult> {
    self.results.iter().find(|r| r.node_id == node_id)
  }

  pub fn count(&self, status: NodeStatus) -> usize {
    self.results.iter().filter(|r| r.status == status).count()
  }
}
