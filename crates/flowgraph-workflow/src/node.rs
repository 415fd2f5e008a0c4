use flowgraph_config::Position;
use serde::{Deserialize, Serialize};

/// The closed set of node kinds the engine knows how to execute.
///
/// Adding a kind means adding a variant here and a match arm in the
/// runtime's dispatcher; the compiler points at every place to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
  /// Entry point. Produces a timestamped manual-trigger payload.
  Trigger,
  /// Reshapes upstream output through a template.
  Transform,
  /// Compares a resolved field against a value.
  Condition,
}

impl NodeKind {
  pub const ALL: [NodeKind; 3] = [NodeKind::Trigger, NodeKind::Transform, NodeKind::Condition];

  /// Parse a wire type tag. Returns `None` for unknown tags.
  pub fn from_tag(tag: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      NodeKind::Trigger => "trigger",
      NodeKind::Transform => "transform",
      NodeKind::Condition => "condition",
    }
  }
}

impl std::fmt::Display for NodeKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A validated node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
  pub node_id: String,
  pub kind: NodeKind,
  pub label: String,
  pub config: serde_json::Value,
  pub position: Option<Position>,
}
