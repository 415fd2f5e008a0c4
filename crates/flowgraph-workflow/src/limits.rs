use serde::{Deserialize, Serialize};

/// Size bounds enforced during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
  pub max_nodes: usize,
  pub max_edges: usize,
  pub max_id_len: usize,
}

impl Default for Limits {
  fn default() -> Self {
    Self {
      max_nodes: 50,
      max_edges: 200,
      max_id_len: 64,
    }
  }
}
