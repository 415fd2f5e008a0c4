use std::collections::HashMap;

use crate::graph::Graph;
use crate::node::Node;

/// A locked workflow ready for execution.
///
/// Only [`validate`](crate::validate) builds one, so holding a `Workflow`
/// means the graph is non-empty, well-typed, referentially intact and
/// acyclic.
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
  pub(crate) nodes: HashMap<String, Node>,
  pub(crate) edges: Vec<(String, String)>,
  pub(crate) graph: Graph,
  pub(crate) execution_order: Vec<String>,
}

impl Workflow {
  /// The graph structure for traversal.
  pub fn graph(&self) -> &Graph {
    &self.graph
  }

  /// Get a node by ID.
  pub fn get_node(&self, node_id: &str) -> Option<&Node> {
    self.nodes.get(node_id)
  }

  /// Node ids in topological order.
  pub fn execution_order(&self) -> &[String] {
    &self.execution_order
  }

  /// Nodes in topological order.
  pub fn ordered_nodes(&self) -> impl Iterator<Item = &Node> {
    self
      .execution_order
      .iter()
      .filter_map(|id| self.nodes.get(id))
  }

  pub fn edges(&self) -> &[(String, String)] {
    &self.edges
  }

  /// Number of nodes. Never zero.
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }
}
