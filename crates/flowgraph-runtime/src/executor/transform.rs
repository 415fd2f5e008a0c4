//! Transform executor.
//!
//! The `template` config key selects the behaviour:
//! - absent or `null`: pass the upstream output through unchanged
//! - a string: interpolate its placeholders
//! - an object: interpolate every string leaf, keeping the object's shape
//!
//! Any other template type is malformed config.

use serde_json::{Value, json};

use super::type_name;
use crate::context::Scope;
use crate::error::NodeError;
use crate::template::{interpolate, interpolate_value};

pub fn execute(config: &Value, scope: &Scope<'_>) -> Result<Value, NodeError> {
  let template = match config {
    Value::Null => None,
    Value::Object(map) => map.get("template"),
    other => {
      return Err(NodeError::malformed(
        "transform",
        format!("expected an object, got {}", type_name(other)),
      ));
    }
  };

  match template {
    None | Some(Value::Null) => Ok(scope.prev().cloned().unwrap_or_else(|| json!({}))),
    Some(Value::String(s)) => Ok(Value::String(interpolate(s, scope))),
    Some(object @ Value::Object(_)) => Ok(interpolate_value(object, scope)),
    Some(other) => Err(NodeError::malformed(
      "transform",
      format!(
        "template must be a string or an object, got {}",
        type_name(other)
      ),
    )),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::ExecutionContext;

  fn trigger_output() -> Value {
    json!({
      "triggeredAt": "2026-10-18T09:30:00.000Z",
      "type": "manual",
      "cron": null,
      "path": null
    })
  }

  fn run(config: Value) -> Result<Value, NodeError> {
    let mut ctx = ExecutionContext::new();
    ctx.insert("t1", trigger_output());
    let parents = vec!["t1".to_string()];
    let scope = Scope::new(&ctx, ctx.get("t1"), &parents);
    execute(&config, &scope)
  }

  #[test]
  fn test_passthrough_without_template() {
    assert_eq!(run(json!({})).unwrap(), trigger_output());
    assert_eq!(run(json!({ "template": null })).unwrap(), trigger_output());
    assert_eq!(run(Value::Null).unwrap(), trigger_output());
  }

  #[test]
  fn test_passthrough_without_upstream() {
    let ctx = ExecutionContext::new();
    let output = execute(&json!({}), &Scope::root(&ctx)).unwrap();
    assert_eq!(output, json!({}));
  }

  #[test]
  fn test_string_template() {
    let output = run(json!({ "template": "{{prev.triggeredAt}}" })).unwrap();
    assert_eq!(output, json!("2026-10-18T09:30:00.000Z"));
  }

  #[test]
  fn test_object_template() {
    let output = run(json!({ "template": { "key": "{{prev.type}}", "n": 1 } })).unwrap();
    assert_eq!(output, json!({ "key": "manual", "n": 1 }));
  }

  #[test]
  fn test_invalid_template_types() {
    for template in [json!(42), json!(true), json!(["{{prev.type}}"])] {
      let err = run(json!({ "template": template })).unwrap_err();
      assert!(matches!(err, NodeError::MalformedConfig { kind: "transform", .. }));
    }
  }

  #[test]
  fn test_non_object_config() {
    let err = run(json!("{{prev.type}}")).unwrap_err();
    assert!(err.to_string().contains("malformed transform config"));
  }
}
