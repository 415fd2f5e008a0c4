use serde::{Deserialize, Serialize};

use crate::edge::EdgeDef;
use crate::node::NodeDef;

/// A submitted flow: the `{nodes, edges}` request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowDef {
  pub nodes: Vec<NodeDef>,
  #[serde(default)]
  pub edges: Vec<EdgeDef>,
}

impl FlowDef {
  pub fn new(nodes: Vec<NodeDef>, edges: Vec<EdgeDef>) -> Self {
    Self { nodes, edges }
  }
}
