//! Structural validation of submitted flow graphs.
//!
//! Checks run in a fixed order and the first failure is returned:
//! 1. the graph has at least one node
//! 2. node and edge counts are within [`Limits`]
//! 3. every node id is non-empty, short enough, and unique
//! 4. every node type tag is a known [`NodeKind`]
//! 5. every edge endpoint names an existing node
//! 6. the edges form a DAG (Kahn's algorithm, which also yields the order)

use std::collections::{HashMap, HashSet};

use flowgraph_config::{EdgeDef, NodeDef};

use crate::error::ValidationError;
use crate::graph::Graph;
use crate::limits::Limits;
use crate::node::{Node, NodeKind};
use crate::workflow::Workflow;

/// Validate `nodes` and `edges` and lock them into an executable [`Workflow`].
pub fn validate(
  nodes: &[NodeDef],
  edges: &[EdgeDef],
  limits: &Limits,
) -> Result<Workflow, ValidationError> {
  if nodes.is_empty() {
    return Err(ValidationError::EmptyGraph);
  }

  if nodes.len() > limits.max_nodes {
    return Err(ValidationError::GraphTooLarge {
      what: "nodes",
      count: nodes.len(),
      limit: limits.max_nodes,
    });
  }

  if edges.len() > limits.max_edges {
    return Err(ValidationError::GraphTooLarge {
      what: "edges",
      count: edges.len(),
      limit: limits.max_edges,
    });
  }

  let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());
  let mut locked: HashMap<String, Node> = HashMap::with_capacity(nodes.len());
  let mut node_ids: Vec<String> = Vec::with_capacity(nodes.len());

  for (index, def) in nodes.iter().enumerate() {
    check_node_id(index, &def.id, limits)?;

    if !seen.insert(def.id.as_str()) {
      return Err(ValidationError::InvalidNodeId {
        index,
        reason: format!("duplicate node id '{}'", def.id),
      });
    }

    let kind =
      NodeKind::from_tag(&def.node_type).ok_or_else(|| ValidationError::UnknownNodeType {
        node_id: def.id.clone(),
        node_type: def.node_type.clone(),
      })?;

    node_ids.push(def.id.clone());
    locked.insert(
      def.id.clone(),
      Node {
        node_id: def.id.clone(),
        kind,
        label: def.label.clone(),
        config: def.config.clone(),
        position: def.position,
      },
    );
  }

  let mut pairs = Vec::with_capacity(edges.len());
  for edge in edges {
    for endpoint in [&edge.source, &edge.target] {
      if !seen.contains(endpoint.as_str()) {
        return Err(ValidationError::DanglingEdge {
          edge_id: edge.id.clone(),
          node_id: endpoint.clone(),
        });
      }
    }
    pairs.push((edge.source.clone(), edge.target.clone()));
  }

  let graph = Graph::new(&node_ids, &pairs);
  let execution_order = graph
    .topological_order()
    .map_err(|path| ValidationError::CycleDetected { path })?;

  Ok(Workflow {
    nodes: locked,
    edges: pairs,
    graph,
    execution_order,
  })
}

fn check_node_id(index: usize, id: &str, limits: &Limits) -> Result<(), ValidationError> {
  if id.is_empty() {
    return Err(ValidationError::InvalidNodeId {
      index,
      reason: "node id is empty".to_string(),
    });
  }

  if id.chars().count() > limits.max_id_len {
    return Err(ValidationError::InvalidNodeId {
      index,
      reason: format!(
        "node id '{}' is longer than {} characters",
        id, limits.max_id_len
      ),
    });
  }

  Ok(())
}
