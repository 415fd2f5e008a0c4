//! Trigger executor.
//!
//! Scheduling metadata in the config (`cron`, `path`) is echoed into the
//! output but not interpreted: every run through the engine is a manual run.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

use super::type_name;
use crate::error::NodeError;

pub fn execute(config: &Value, now: DateTime<Utc>) -> Result<Value, NodeError> {
  let (cron, path) = match config {
    Value::Null => (Value::Null, Value::Null),
    Value::Object(map) => (
      map.get("cron").cloned().unwrap_or(Value::Null),
      map.get("path").cloned().unwrap_or(Value::Null),
    ),
    other => {
      return Err(NodeError::malformed(
        "trigger",
        format!("expected an object, got {}", type_name(other)),
      ));
    }
  };

  Ok(json!({
    "triggeredAt": now.to_rfc3339_opts(SecondsFormat::Millis, true),
    "type": "manual",
    "cron": cron,
    "path": path,
  }))
}
