//! Execution events and notifiers for observability.
//!
//! Events are emitted during a run so that consumers can keep an audit
//! trail, persist results, stream progress to a UI, etc. The runtime does
//! not care where they go.

use flowgraph_workflow::NodeKind;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

/// Events emitted during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEvent {
  /// A validated workflow started executing on behalf of `principal`.
  WorkflowStarted {
    execution_id: String,
    principal: String,
    node_count: usize,
  },

  /// A node was dispatched to its executor.
  NodeStarted {
    execution_id: String,
    node_id: String,
    kind: NodeKind,
  },

  /// A node completed successfully.
  NodeCompleted {
    execution_id: String,
    node_id: String,
    data: serde_json::Value,
    duration_ms: u64,
  },

  /// A node failed. Its downstream may be skipped.
  NodeFailed {
    execution_id: String,
    node_id: String,
    error: String,
    duration_ms: u64,
  },

  /// A node was not executed because every upstream failed or was skipped.
  NodeSkipped {
    execution_id: String,
    node_id: String,
    reason: String,
  },

  /// Every node has a result.
  WorkflowCompleted {
    execution_id: String,
    total_duration_ms: u64,
  },

  /// The run stopped before every node was dispatched.
  WorkflowCancelled { execution_id: String },
}

/// Trait for receiving execution events.
///
/// The runtime calls `notify` for each event - implementations decide
/// what to do with them (persist, broadcast, log, ignore, etc.).
pub trait ExecutionNotifier: Send + Sync {
  fn notify(&self, event: ExecutionEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// A notifier that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  // Unbounded so a slow consumer never stalls a run. Volume is a handful of
  // events per node.
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // Ignore send errors - receiver may have been dropped
    let _ = self.sender.send(event);
  }
}

/// A notifier that writes every event to the `flowgraph::audit` tracing
/// target as a JSON document.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl ExecutionNotifier for TracingNotifier {
  fn notify(&self, event: ExecutionEvent) {
    match serde_json::to_string(&event) {
      Ok(json) => info!(target: "flowgraph::audit", event = %json),
      Err(e) => info!(target: "flowgraph::audit", error = %e, "unserializable execution event"),
    }
  }
}
