use serde::{Deserialize, Serialize};

/// Canvas coordinate. Carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
  pub id: String,
  /// Node kind tag, e.g. "trigger". Checked during validation.
  #[serde(rename = "type")]
  pub node_type: String,
  /// Display-only.
  #[serde(default)]
  pub label: String,
  /// Kind-specific payload, interpreted by the node's executor at run time.
  #[serde(default)]
  pub config: serde_json::Value,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub position: Option<Position>,
}

impl NodeDef {
  pub fn new(id: impl Into<String>, node_type: impl Into<String>, config: serde_json::Value) -> Self {
    Self {
      id: id.into(),
      node_type: node_type.into(),
      label: String::new(),
      config,
      position: None,
    }
  }
}
