//! Node executors, one per [`NodeKind`].
//!
//! Every built-in executor is a pure function of the node's config and a
//! read-only [`Scope`]. The runtime writes the returned output back into the
//! execution context.

pub mod condition;
pub mod transform;
pub mod trigger;

use async_trait::async_trait;
use chrono::Utc;
use flowgraph_workflow::{Node, NodeKind};
use serde_json::Value;

use crate::context::Scope;
use crate::error::NodeError;

/// Runs a single node. The runtime bounds each call with the per-node
/// timeout, so implementations that await can be cut off mid-node.
#[async_trait]
pub trait NodeExecutor: Send + Sync {
  async fn execute(&self, node: &Node, scope: &Scope<'_>) -> Result<Value, NodeError>;
}

/// Dispatches to the trigger, transform and condition executors.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinExecutor;

#[async_trait]
impl NodeExecutor for BuiltinExecutor {
  async fn execute(&self, node: &Node, scope: &Scope<'_>) -> Result<Value, NodeError> {
    execute(node, scope)
  }
}

/// Execute a node with the executor for its kind.
pub fn execute(node: &Node, scope: &Scope<'_>) -> Result<Value, NodeError> {
  match node.kind {
    NodeKind::Trigger => trigger::execute(&node.config, Utc::now()),
    NodeKind::Transform => transform::execute(&node.config, scope),
    NodeKind::Condition => condition::execute(&node.config, scope),
  }
}

/// Name of a JSON value's type, for config error messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
