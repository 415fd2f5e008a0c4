use std::collections::{BTreeSet, HashMap, HashSet};

/// Graph structure for traversal and analysis.
///
/// Neighbour lists keep edge declaration order, and node ids keep the order
/// they were declared in. Both orders feed the deterministic tie-breaks in
/// [`Graph::topological_order`] and the runtime's choice of `prev`.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
  /// Node ids in declaration order.
  nodes: Vec<String>,
  /// Adjacency list: node_id -> list of downstream node_ids.
  adjacency: HashMap<String, Vec<String>>,
  /// Reverse adjacency: node_id -> list of upstream node_ids.
  reverse_adjacency: HashMap<String, Vec<String>>,
  /// Nodes with no incoming edges.
  entry_points: Vec<String>,
  /// Nodes with multiple incoming edges (join points).
  join_points: HashSet<String>,
}

impl Graph {
  /// Build a graph from node ids and `(source, target)` edges.
  pub fn new(node_ids: &[String], edges: &[(String, String)]) -> Self {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut reverse_adjacency: HashMap<String, Vec<String>> = HashMap::new();

    // Initialize all nodes
    for node_id in node_ids {
      adjacency.entry(node_id.clone()).or_default();
      reverse_adjacency.entry(node_id.clone()).or_default();
    }

    // Build adjacency lists
    for (from, to) in edges {
      adjacency.entry(from.clone()).or_default().push(to.clone());
      reverse_adjacency
        .entry(to.clone())
        .or_default()
        .push(from.clone());
    }

    // Find entry points (no incoming edges)
    let entry_points: Vec<String> = node_ids
      .iter()
      .filter(|id| reverse_adjacency.get(*id).is_none_or(|v| v.is_empty()))
      .cloned()
      .collect();

    // Find join points (multiple incoming edges)
    let join_points: HashSet<String> = reverse_adjacency
      .iter()
      .filter(|(_, incoming)| incoming.len() > 1)
      .map(|(id, _)| id.clone())
      .collect();

    Self {
      nodes: node_ids.to_vec(),
      adjacency,
      reverse_adjacency,
      entry_points,
      join_points,
    }
  }

  /// Get entry points (nodes with no incoming edges), in declaration order.
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  /// Get downstream nodes for a given node.
  pub fn downstream(&self, node_id: &str) -> &[String] {
    self
      .adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get upstream nodes for a given node, in edge declaration order.
  pub fn upstream(&self, node_id: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// The node whose output is threaded into `node_id` as `prev`: the source
  /// of its first incoming edge.
  pub fn primary_upstream(&self, node_id: &str) -> Option<&str> {
    self.upstream(node_id).first().map(String::as_str)
  }

  /// Check if a node is a join point (has multiple incoming edges).
  pub fn is_join_point(&self, node_id: &str) -> bool {
    self.join_points.contains(node_id)
  }

  /// Order nodes so every edge points forward, using Kahn's algorithm.
  ///
  /// Among nodes that are ready at the same time, the one declared first
  /// goes first. On a cycle, returns `Err` with one cycle as a closed path
  /// (first and last element equal).
  pub fn topological_order(&self) -> Result<Vec<String>, Vec<String>> {
    let position: HashMap<&str, usize> = self
      .nodes
      .iter()
      .enumerate()
      .map(|(i, id)| (id.as_str(), i))
      .collect();

    let mut in_degree: HashMap<&str, usize> = self
      .nodes
      .iter()
      .map(|id| (id.as_str(), self.upstream(id).len()))
      .collect();

    let mut ready: BTreeSet<usize> = self
      .nodes
      .iter()
      .enumerate()
      .filter(|(_, id)| in_degree[id.as_str()] == 0)
      .map(|(i, _)| i)
      .collect();

    let mut sorted = Vec::with_capacity(self.nodes.len());
    while let Some(index) = ready.pop_first() {
      let node_id = &self.nodes[index];
      sorted.push(node_id.clone());

      for next in self.downstream(node_id) {
        let Some(degree) = in_degree.get_mut(next.as_str()) else {
          continue;
        };
        *degree -= 1;
        if *degree == 0 {
          ready.insert(position[next.as_str()]);
        }
      }
    }

    if sorted.len() == self.nodes.len() {
      return Ok(sorted);
    }

    let processed: HashSet<&str> = sorted.iter().map(String::as_str).collect();
    Err(self.find_cycle(&processed))
  }

  /// Walk backwards from an unprocessed node until a node repeats.
  ///
  /// Every node Kahn's algorithm left behind still has an unprocessed
  /// predecessor, so the walk always closes a loop.
  fn find_cycle(&self, processed: &HashSet<&str>) -> Vec<String> {
    let Some(start) = self
      .nodes
      .iter()
      .find(|id| !processed.contains(id.as_str()))
    else {
      return Vec::new();
    };

    let mut path: Vec<&str> = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut current = start.as_str();

    loop {
      if let Some(&at) = seen.get(current) {
        // The walk went against the edges; reverse it to read source -> target.
        let mut cycle: Vec<String> = path[at..].iter().rev().map(|s| s.to_string()).collect();
        cycle.push(cycle[0].clone());
        return cycle;
      }
      seen.insert(current, path.len());
      path.push(current);

      match self
        .upstream(current)
        .iter()
        .find(|up| !processed.contains(up.as_str()))
      {
        Some(up) => current = up.as_str(),
        None => return path.iter().map(|s| s.to_string()).collect(),
      }
    }
  }
}
