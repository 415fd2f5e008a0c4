//! Run orchestration.
//!
//! The [`Runtime`] walks a validated [`Workflow`] in topological order and
//! executes one node at a time. For each node it:
//! 1. skips the node if every upstream node failed or was skipped
//! 2. builds a [`Scope`] whose `prev` is the primary upstream's output
//! 3. dispatches to the node's executor under the per-node timeout
//! 4. records the result and writes the output into the context
//!
//! Node failures are contained: a failed node blocks only what is reachable
//! exclusively through it, and the run still completes.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use flowgraph_config::FlowDef;
use flowgraph_workflow::{Limits, Node, NodeKind, Workflow, validate};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::context::{ExecutionContext, Scope};
use crate::error::{NodeError, RuntimeError};
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::executor::{BuiltinExecutor, NodeExecutor};
use crate::result::{NodeResult, NodeStatus, RunResult};

/// Configuration for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
  /// Upper bound on a single node's execution. `None` disables the bound.
  pub node_timeout: Option<Duration>,
  /// When set, a condition with `pass: false` blocks its downstream the same
  /// way a failed node does.
  pub condition_gating: bool,
}

impl Default for RuntimeConfig {
  fn default() -> Self {
    Self {
      node_timeout: Some(Duration::from_secs(30)),
      condition_gating: false,
    }
  }
}

/// The flow runtime.
///
/// Generic over `N: ExecutionNotifier` to allow different notification
/// strategies, and over `E: NodeExecutor` for how a single node runs. Holds
/// no per-run state, so one runtime can serve any number of concurrent runs.
pub struct Runtime<N: ExecutionNotifier = NoopNotifier, E: NodeExecutor = BuiltinExecutor> {
  config: RuntimeConfig,
  notifier: N,
  executor: E,
}

impl Runtime<NoopNotifier> {
  /// Create a runtime that discards execution events.
  pub fn new(config: RuntimeConfig) -> Self {
    Self::with_notifier(config, NoopNotifier)
  }
}

impl<N: ExecutionNotifier> Runtime<N> {
  pub fn with_notifier(config: RuntimeConfig, notifier: N) -> Self {
    Self::with_executor(config, notifier, BuiltinExecutor)
  }
}

impl<N: ExecutionNotifier, E: NodeExecutor> Runtime<N, E> {
  pub fn with_executor(config: RuntimeConfig, notifier: N, executor: E) -> Self {
    Self {
      config,
      notifier,
      executor,
    }
  }

  /// Validate a submitted flow and execute it.
  pub async fn run(
    &self,
    flow: &FlowDef,
    limits: &Limits,
    principal: &str,
    cancel: CancellationToken,
  ) -> Result<RunResult, RuntimeError> {
    let workflow = validate(&flow.nodes, &flow.edges, limits)?;
    self.invoke(&workflow, principal, cancel).await
  }

  /// Execute a validated workflow.
  ///
  /// Returns [`RuntimeError::Cancelled`] if `cancel` fires; the check happens
  /// before each node is dispatched, never in the middle of one.
  #[instrument(
    name = "runtime_invoke",
    skip(self, workflow, cancel),
    fields(node_count = workflow.node_count())
  )]
  pub async fn invoke(
    &self,
    workflow: &Workflow,
    principal: &str,
    cancel: CancellationToken,
  ) -> Result<RunResult, RuntimeError> {
    let execution_id = uuid::Uuid::new_v4().to_string();
    let graph = workflow.graph();

    info!(execution_id = %execution_id, "workflow_started");
    self.notifier.notify(ExecutionEvent::WorkflowStarted {
      execution_id: execution_id.clone(),
      principal: principal.to_string(),
      node_count: workflow.node_count(),
    });

    let mut context = ExecutionContext::new();
    // Nodes that must not feed their downstream: failed, skipped, or gated.
    let mut blocked: HashSet<&str> = HashSet::new();
    let mut results = Vec::with_capacity(workflow.node_count());

    for node in workflow.ordered_nodes() {
      if cancel.is_cancelled() {
        warn!(execution_id = %execution_id, node_id = %node.node_id, "workflow cancelled");
        self.notifier.notify(ExecutionEvent::WorkflowCancelled {
          execution_id: execution_id.clone(),
        });
        return Err(RuntimeError::Cancelled);
      }

      let node_id = node.node_id.as_str();
      let upstream = graph.upstream(node_id);

      if !upstream.is_empty() && upstream.iter().all(|up| blocked.contains(up.as_str())) {
        let reason = format!("skipped: no upstream node succeeded ({})", upstream.join(", "));
        info!(execution_id = %execution_id, node_id = %node_id, "node_skipped");
        self.notifier.notify(ExecutionEvent::NodeSkipped {
          execution_id: execution_id.clone(),
          node_id: node_id.to_string(),
          reason: reason.clone(),
        });
        blocked.insert(node_id);
        context.insert(node_id, Value::Null);
        results.push(NodeResult {
          node_id: node_id.to_string(),
          status: NodeStatus::Skipped,
          output: Value::Null,
          duration_ms: 0,
          error: Some(reason),
        });
        continue;
      }

      if graph.is_join_point(node_id) {
        debug!(
          node_id = %node_id,
          upstream = ?upstream,
          "join point: only the first upstream output is bound to prev"
        );
      }

      self.notifier.notify(ExecutionEvent::NodeStarted {
        execution_id: execution_id.clone(),
        node_id: node_id.to_string(),
        kind: node.kind,
      });

      let started = Instant::now();
      let outcome = {
        let prev = graph.primary_upstream(node_id).and_then(|up| context.get(up));
        let scope = Scope::new(&context, prev, upstream);
        self.dispatch(node, &scope).await
      };
      let duration_ms = started.elapsed().as_millis() as u64;

      match outcome {
        Ok(output) => {
          info!(
            execution_id = %execution_id,
            node_id = %node_id,
            duration_ms,
            "node_completed"
          );
          if self.gates(node, &output) {
            debug!(node_id = %node_id, "condition failed, gating downstream");
            blocked.insert(node_id);
          }
          self.notifier.notify(ExecutionEvent::NodeCompleted {
            execution_id: execution_id.clone(),
            node_id: node_id.to_string(),
            data: output.clone(),
            duration_ms,
          });
          context.insert(node_id, output.clone());
          results.push(NodeResult {
            node_id: node_id.to_string(),
            status: NodeStatus::Success,
            output,
            duration_ms,
            error: None,
          });
        }
        Err(e) => {
          warn!(
            execution_id = %execution_id,
            node_id = %node_id,
            error = %e,
            duration_ms,
            "node_failed"
          );
          self.notifier.notify(ExecutionEvent::NodeFailed {
            execution_id: execution_id.clone(),
            node_id: node_id.to_string(),
            error: e.to_string(),
            duration_ms,
          });
          blocked.insert(node_id);
          context.insert(node_id, Value::Null);
          results.push(NodeResult {
            node_id: node_id.to_string(),
            status: NodeStatus::Error,
            output: Value::Null,
            duration_ms,
            error: Some(e.to_string()),
          });
        }
      }
    }

    let total_duration_ms: u64 = results.iter().map(|r| r.duration_ms).sum();

    info!(
      execution_id = %execution_id,
      total_duration_ms,
      "workflow_completed"
    );
    self.notifier.notify(ExecutionEvent::WorkflowCompleted {
      execution_id: execution_id.clone(),
      total_duration_ms,
    });

    Ok(RunResult {
      success: true,
      execution_id,
      results,
      total_duration_ms,
    })
  }

  /// Run a node's executor under the configured timeout.
  async fn dispatch(&self, node: &Node, scope: &Scope<'_>) -> Result<Value, NodeError> {
    let execution = self.executor.execute(node, scope);

    match self.config.node_timeout {
      Some(limit) => tokio::time::timeout(limit, execution)
        .await
        .map_err(|_| NodeError::Timeout {
          timeout_ms: limit.as_millis() as u64,
        })?,
      None => execution.await,
    }
  }

  /// Whether a successful node's output should block its downstream.
  fn gates(&self, node: &Node, output: &Value) -> bool {
    self.config.condition_gating
      && node.kind == NodeKind::Condition
      && output.get("pass") == Some(&Value::Bool(false))
  }
}
