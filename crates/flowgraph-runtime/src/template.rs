//! Placeholder interpolation.
//!
//! Templates use `{{ path }}` placeholders, where `path` is a dotted lookup
//! resolved through a [`Scope`]. Nothing else is evaluated: there are no
//! filters, expressions or function calls.
//!
//! # Examples
//!
//! ```json
//! {
//!   "when": "{{ prev.triggeredAt }}",
//!   "summary": "{{prev.type}} run from {{ parents.t1.cron }}",
//!   "static": "unchanged",
//!   "count": 42
//! }
//! ```
//!
//! Resolved values render as:
//! - strings verbatim
//! - numbers and booleans in their display form
//! - objects and arrays as compact JSON
//! - `null` and unresolved paths as an empty string

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::context::Scope;

static PLACEHOLDER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid"));

/// Replace every placeholder in `template` with its rendered value.
pub fn interpolate(template: &str, scope: &Scope<'_>) -> String {
  PLACEHOLDER
    .replace_all(template, |caps: &Captures<'_>| render(scope.resolve(&caps[1])))
    .into_owned()
}

/// Interpolate every string leaf of `value`, preserving its shape.
///
/// Object keys and non-string leaves are left as they are.
pub fn interpolate_value(value: &Value, scope: &Scope<'_>) -> Value {
  match value {
    Value::String(s) => Value::String(interpolate(s, scope)),
    Value::Array(items) => Value::Array(items.iter().map(|v| interpolate_value(v, scope)).collect()),
    Value::Object(map) => Value::Object(
      map
        .iter()
        .map(|(k, v)| (k.clone(), interpolate_value(v, scope)))
        .collect(),
    ),
    other => other.clone(),
  }
}

/// Render a resolved value as text.
pub fn render(value: Option<&Value>) -> String {
  match value {
    None | Some(Value::Null) => String::new(),
    Some(Value::String(s)) => s.clone(),
    Some(other) => other.to_string(),
  }
}
