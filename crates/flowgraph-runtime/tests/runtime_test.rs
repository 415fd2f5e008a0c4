//! Integration tests for Runtime::run / Runtime::invoke.

use std::time::Duration;

use async_trait::async_trait;
use flowgraph_config::{EdgeDef, FlowDef, NodeDef};
use flowgraph_runtime::{
  BuiltinExecutor, ChannelNotifier, ExecutionEvent, NodeError, NodeExecutor, NodeStatus,
  NoopNotifier, Runtime, RuntimeConfig, RuntimeError, Scope,
};
use flowgraph_workflow::{Limits, Node, validate};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn trigger(id: &str) -> NodeDef {
  NodeDef::new(id, "trigger", json!({ "cron": "0 * * * *" }))
}

fn transform(id: &str, config: Value) -> NodeDef {
  NodeDef::new(id, "transform", config)
}

fn condition(id: &str, value: &str) -> NodeDef {
  NodeDef::new(
    id,
    "condition",
    json!({ "field": "prev.type", "operator": "==", "value": value }),
  )
}

fn edge(source: &str, target: &str) -> EdgeDef {
  EdgeDef::new(format!("{}-{}", source, target), source, target)
}

async fn run(flow: FlowDef) -> Result<flowgraph_runtime::RunResult, RuntimeError> {
  Runtime::new(RuntimeConfig::default())
    .run(&flow, &Limits::default(), "tester", CancellationToken::new())
    .await
}

#[tokio::test]
async fn test_trigger_transform_end_to_end() {
  let flow = FlowDef::new(
    vec![
      trigger("t1"),
      transform("x1", json!({ "template": "{{prev.triggeredAt}}" })),
    ],
    vec![edge("t1", "x1")],
  );

  let result = run(flow).await.unwrap();

  assert!(result.success);
  assert_eq!(result.results.len(), 2);
  assert_eq!(result.results[0].node_id, "t1");
  assert_eq!(result.results[0].status, NodeStatus::Success);
  assert_eq!(result.results[1].status, NodeStatus::Success);
  assert_eq!(
    result.results[1].output,
    result.results[0].output["triggeredAt"]
  );
  assert_eq!(
    result.total_duration_ms,
    result.results.iter().map(|r| r.duration_ms).sum::<u64>()
  );
}

#[tokio::test]
async fn test_trigger_output_shape_is_stable() {
  let mut stamps = Vec::new();
  for _ in 0..3 {
    let result = run(FlowDef::new(vec![trigger("t1")], vec![])).await.unwrap();
    let node = &result.results[0];
    assert_eq!(node.status, NodeStatus::Success);
    assert_eq!(node.output["type"], "manual");
    assert!(node.output["triggeredAt"].is_string());
    stamps.push(result.execution_id);
  }
  stamps.dedup();
  assert_eq!(stamps.len(), 3, "every run gets its own execution id");
}

#[tokio::test]
async fn test_object_template_preserves_shape() {
  let flow = FlowDef::new(
    vec![
      trigger("t1"),
      transform("x1", json!({ "template": { "key": "{{prev.type}}" } })),
    ],
    vec![edge("t1", "x1")],
  );

  let result = run(flow).await.unwrap();
  assert_eq!(result.results[1].output, json!({ "key": "manual" }));
}

#[tokio::test]
async fn test_passthrough_equals_trigger_output() {
  let flow = FlowDef::new(
    vec![trigger("t1"), transform("x1", json!({}))],
    vec![edge("t1", "x1")],
  );

  let result = run(flow).await.unwrap();
  assert_eq!(result.results[1].output, result.results[0].output);
}

#[tokio::test]
async fn test_condition_pass_and_fail_both_succeed() {
  for (value, expected) in [("manual", true), ("scheduled", false)] {
    let flow = FlowDef::new(
      vec![trigger("t1"), condition("c1", value)],
      vec![edge("t1", "c1")],
    );

    let result = run(flow).await.unwrap();

    assert!(result.success);
    assert_eq!(result.results[1].status, NodeStatus::Success);
    assert_eq!(result.results[1].output["pass"], expected);
  }
}

#[tokio::test]
async fn test_false_condition_does_not_skip_by_default() {
  let flow = FlowDef::new(
    vec![
      trigger("t1"),
      condition("c1", "scheduled"),
      transform("x1", json!({ "template": "{{prev.pass}}" })),
    ],
    vec![edge("t1", "c1"), edge("c1", "x1")],
  );

  let result = run(flow).await.unwrap();

  assert_eq!(result.count(NodeStatus::Skipped), 0);
  assert_eq!(result.get("x1").unwrap().output, json!("false"));
}

#[tokio::test]
async fn test_condition_gating_is_opt_in() {
  let flow = FlowDef::new(
    vec![
      trigger("t1"),
      condition("c1", "scheduled"),
      transform("x1", json!({})),
      condition("c2", "manual"),
      transform("x2", json!({})),
    ],
    vec![
      edge("t1", "c1"),
      edge("c1", "x1"),
      edge("t1", "c2"),
      edge("c2", "x2"),
    ],
  );

  let config = RuntimeConfig {
    condition_gating: true,
    ..RuntimeConfig::default()
  };
  let result = Runtime::new(config)
    .run(&flow, &Limits::default(), "tester", CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(result.get("c1").unwrap().status, NodeStatus::Success);
  assert_eq!(result.get("x1").unwrap().status, NodeStatus::Skipped);
  assert_eq!(result.get("x2").unwrap().status, NodeStatus::Success);
}

#[tokio::test]
async fn test_error_skips_only_dependent_branch() {
  // t1 -> bad -> after -> tail
  // t1 -> good
  let flow = FlowDef::new(
    vec![
      trigger("t1"),
      transform("bad", json!({ "template": 42 })),
      transform("after", json!({})),
      transform("tail", json!({})),
      transform("good", json!({ "template": "{{prev.type}}" })),
    ],
    vec![
      edge("t1", "bad"),
      edge("bad", "after"),
      edge("after", "tail"),
      edge("t1", "good"),
    ],
  );

  let result = run(flow).await.unwrap();

  assert!(result.success);
  let bad = result.get("bad").unwrap();
  assert_eq!(bad.status, NodeStatus::Error);
  assert_eq!(bad.output, Value::Null);
  assert!(bad.error.as_deref().unwrap().contains("template"));

  for id in ["after", "tail"] {
    let skipped = result.get(id).unwrap();
    assert_eq!(skipped.status, NodeStatus::Skipped, "{}", id);
    assert_eq!(skipped.output, Value::Null);
    assert!(skipped.error.is_some());
  }

  assert_eq!(result.get("good").unwrap().status, NodeStatus::Success);
  assert_eq!(result.get("good").unwrap().output, json!("manual"));
}

#[tokio::test]
async fn test_join_with_one_healthy_parent_still_runs() {
  let flow = FlowDef::new(
    vec![
      trigger("t1"),
      transform("bad", json!({ "template": true })),
      transform("ok", json!({ "template": { "from": "ok" } })),
      transform("join", json!({ "template": "{{parents.ok.from}}|{{prev}}" })),
    ],
    vec![
      edge("t1", "bad"),
      edge("t1", "ok"),
      edge("bad", "join"),
      edge("ok", "join"),
    ],
  );

  let result = run(flow).await.unwrap();

  let join = result.get("join").unwrap();
  assert_eq!(join.status, NodeStatus::Success);
  // "bad" owns the first incoming edge, so prev is its null output.
  assert_eq!(join.output, json!("ok|"));
}

#[tokio::test]
async fn test_join_behind_skipped_parent_sees_null_prev() {
  let flow = FlowDef::new(
    vec![
      trigger("t1"),
      transform("bad", json!({ "template": true })),
      transform("mid", json!({})),
      transform("ok", json!({ "template": "fine" })),
      transform("join", json!({})),
    ],
    vec![
      edge("t1", "bad"),
      edge("bad", "mid"),
      edge("t1", "ok"),
      edge("mid", "join"),
      edge("ok", "join"),
    ],
  );

  let result = run(flow).await.unwrap();

  assert_eq!(result.get("mid").unwrap().status, NodeStatus::Skipped);
  let join = result.get("join").unwrap();
  assert_eq!(join.status, NodeStatus::Success);
  // Same as an errored first parent: the blocked node's output is null.
  assert_eq!(join.output, Value::Null);
}

/// Delegates to the built-in executors, but stalls on nodes labelled "slow".
struct StallingExecutor;

#[async_trait]
impl NodeExecutor for StallingExecutor {
  async fn execute(&self, node: &Node, scope: &Scope<'_>) -> Result<Value, NodeError> {
    if node.label == "slow" {
      tokio::time::sleep(Duration::from_secs(30)).await;
    }
    BuiltinExecutor.execute(node, scope).await
  }
}

#[tokio::test]
async fn test_node_timeout_fails_node_and_skips_downstream() {
  let mut slow = transform("slow", json!({}));
  slow.label = "slow".to_string();
  let flow = FlowDef::new(
    vec![
      trigger("t1"),
      slow,
      transform("after", json!({})),
      transform("side", json!({ "template": "side" })),
    ],
    vec![edge("t1", "slow"), edge("slow", "after"), edge("t1", "side")],
  );

  let runtime = Runtime::with_executor(
    RuntimeConfig {
      node_timeout: Some(Duration::from_millis(20)),
      ..RuntimeConfig::default()
    },
    NoopNotifier,
    StallingExecutor,
  );
  let result = runtime
    .run(&flow, &Limits::default(), "tester", CancellationToken::new())
    .await
    .unwrap();

  let slow = result.get("slow").unwrap();
  assert_eq!(slow.status, NodeStatus::Error);
  assert_eq!(
    slow.error.as_deref(),
    Some(NodeError::Timeout { timeout_ms: 20 }.to_string().as_str())
  );
  assert_eq!(result.get("after").unwrap().status, NodeStatus::Skipped);
  assert_eq!(result.get("side").unwrap().status, NodeStatus::Success);
  assert!(result.success);
}

#[tokio::test]
async fn test_fan_out_shares_upstream_output() {
  let flow = FlowDef::new(
    vec![
      trigger("t1"),
      transform("a", json!({})),
      transform("b", json!({})),
    ],
    vec![edge("t1", "a"), edge("t1", "b")],
  );

  let result = run(flow).await.unwrap();

  assert_eq!(result.get("a").unwrap().output, result.get("t1").unwrap().output);
  assert_eq!(result.get("b").unwrap().output, result.get("t1").unwrap().output);
}

#[tokio::test]
async fn test_results_follow_topological_order() {
  let flow = FlowDef::new(
    vec![
      transform("x2", json!({})),
      transform("x1", json!({})),
      trigger("t1"),
    ],
    vec![edge("t1", "x1"), edge("x1", "x2")],
  );

  let result = run(flow).await.unwrap();
  let order: Vec<&str> = result.results.iter().map(|r| r.node_id.as_str()).collect();
  assert_eq!(order, vec!["t1", "x1", "x2"]);
}

#[tokio::test]
async fn test_validation_failures_run_nothing() {
  let err = run(FlowDef::default()).await.unwrap_err();
  assert!(matches!(err, RuntimeError::Validation(ref v) if v.code() == "EMPTY_GRAPH"));

  let cyclic = FlowDef::new(
    vec![trigger("a"), transform("b", json!({}))],
    vec![edge("a", "b"), edge("b", "a")],
  );
  let err = run(cyclic).await.unwrap_err();
  assert!(err.to_string().contains("cycle"));

  let unknown = FlowDef::new(vec![NodeDef::new("h", "http_request", json!({}))], vec![]);
  let err = run(unknown).await.unwrap_err();
  assert!(matches!(err, RuntimeError::Validation(ref v) if v.code() == "UNKNOWN_NODE_TYPE"));
}

#[tokio::test]
async fn test_cancelled_run_dispatches_nothing() {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let runtime = Runtime::with_notifier(RuntimeConfig::default(), ChannelNotifier::new(tx));

  let flow = FlowDef::new(vec![trigger("t1")], vec![]);
  let workflow = validate(&flow.nodes, &flow.edges, &Limits::default()).unwrap();

  let cancel = CancellationToken::new();
  cancel.cancel();

  let err = runtime.invoke(&workflow, "tester", cancel).await.unwrap_err();
  assert!(matches!(err, RuntimeError::Cancelled));

  assert!(matches!(
    rx.recv().await.unwrap(),
    ExecutionEvent::WorkflowStarted { .. }
  ));
  assert!(matches!(
    rx.recv().await.unwrap(),
    ExecutionEvent::WorkflowCancelled { .. }
  ));
  assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_events_attribute_principal_and_track_nodes() {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let runtime = Runtime::with_notifier(RuntimeConfig::default(), ChannelNotifier::new(tx));

  let flow = FlowDef::new(
    vec![
      trigger("t1"),
      transform("bad", json!({ "template": 1 })),
      transform("after", json!({})),
    ],
    vec![edge("t1", "bad"), edge("bad", "after")],
  );

  let result = runtime
    .run(&flow, &Limits::default(), "user-42", CancellationToken::new())
    .await
    .unwrap();
  drop(runtime);

  let mut events = Vec::new();
  while let Some(event) = rx.recv().await {
    events.push(event);
  }

  match &events[0] {
    ExecutionEvent::WorkflowStarted {
      execution_id,
      principal,
      node_count,
    } => {
      assert_eq!(execution_id, &result.execution_id);
      assert_eq!(principal, "user-42");
      assert_eq!(*node_count, 3);
    }
    other => panic!("unexpected first event: {:?}", other),
  }

  let names: Vec<&str> = events
    .iter()
    .map(|e| match e {
      ExecutionEvent::WorkflowStarted { .. } => "workflow_started",
      ExecutionEvent::NodeStarted { .. } => "node_started",
      ExecutionEvent::NodeCompleted { .. } => "node_completed",
      ExecutionEvent::NodeFailed { .. } => "node_failed",
      ExecutionEvent::NodeSkipped { .. } => "node_skipped",
      ExecutionEvent::WorkflowCompleted { .. } => "workflow_completed",
      ExecutionEvent::WorkflowCancelled { .. } => "workflow_cancelled",
    })
    .collect();

  assert_eq!(
    names,
    vec![
      "workflow_started",
      "node_started",
      "node_completed",
      "node_started",
      "node_failed",
      "node_skipped",
      "workflow_completed",
    ]
  );
}

#[tokio::test]
async fn test_layout_fields_do_not_change_results() {
  let plain = FlowDef::new(
    vec![trigger("t1"), transform("x1", json!({ "template": "{{prev.type}}" }))],
    vec![edge("t1", "x1")],
  );
  let mut decorated = plain.clone();
  for (i, node) in decorated.nodes.iter_mut().enumerate() {
    node.label = format!("Step {}", i);
    node.position = Some(flowgraph_config::Position {
      x: i as f64 * 100.0,
      y: 0.0,
    });
  }

  let a = run(plain).await.unwrap();
  let b = run(decorated).await.unwrap();

  assert_eq!(a.results[1].output, b.results[1].output);
}
