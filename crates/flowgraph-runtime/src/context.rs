//! Per-run execution context and the read-only scope executors see.

use std::collections::HashMap;

use serde_json::Value;

/// Outputs produced so far in a run, keyed by node id.
///
/// Created empty at run start and written by the runtime once per node,
/// after the node completes. Failed and skipped nodes are recorded as
/// `null`. Executors never write to it.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
  outputs: HashMap<String, Value>,
}

impl ExecutionContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, node_id: &str) -> Option<&Value> {
    self.outputs.get(node_id)
  }

  pub fn insert(&mut self, node_id: impl Into<String>, output: Value) {
    self.outputs.insert(node_id.into(), output);
  }

}

/// An immutable view of the context from one node's point of view.
///
/// Dotted paths resolve from one of three roots:
/// - `prev` - output of the node's primary upstream
/// - `parents.<id>` - output of a direct upstream node
/// - `<id>` - output of any node that already ran
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
  context: &'a ExecutionContext,
  prev: Option<&'a Value>,
  parents: &'a [String],
}

impl<'a> Scope<'a> {
  pub fn new(context: &'a ExecutionContext, prev: Option<&'a Value>, parents: &'a [String]) -> Self {
    Self {
      context,
      prev,
      parents,
    }
  }

  /// A scope with no upstream, as seen by entry nodes.
  pub fn root(context: &'a ExecutionContext) -> Self {
    Self::new(context, None, &[])
  }

  pub fn prev(&self) -> Option<&'a Value> {
    self.prev
  }

  /// Resolve a dotted path such as `prev.data.items.0`.
  ///
  /// Object segments are looked up by key and array segments by index.
  /// Returns `None` as soon as a segment does not resolve.
  pub fn resolve(&self, path: &str) -> Option<&'a Value> {
    let mut segments = path.trim().split('.');

    let base = match segments.next()? {
      "prev" => self.prev?,
      "parents" => {
        let parent = segments.next()?;
        if !self.parents.iter().any(|p| p == parent) {
          return None;
        }
        self.context.get(parent)?
      }
      node_id => self.context.get(node_id)?,
    };

    segments.try_fold(base, |value, segment| step(value, segment))
  }
}

fn step<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
  match value {
    Value::Object(map) => map.get(segment),
    Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
    _ => None,
  }
}
