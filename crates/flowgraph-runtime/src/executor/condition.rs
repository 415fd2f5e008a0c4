//! Condition executor.
//!
//! Config shape: `{ "field": "prev.type", "operator": "==", "value": "manual" }`.
//!
//! Both sides are rendered to strings before comparing, so `5` and `"5"`
//! are equal. A missing or null side renders as the JSON literal `""`, so it
//! never equals an empty string value. Ordering operators parse both sides as numbers and are false
//! when either side is not numeric. A `pass: false` outcome is a normal,
//! successful result.

use std::str::FromStr;

use serde_json::{Map, Value, json};

use super::type_name;
use crate::context::Scope;
use crate::error::NodeError;
use crate::template::{interpolate, render};

/// Comparison operators accepted in a condition's `operator` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
  Equals,
  NotEquals,
  GreaterThan,
  LessThan,
  GreaterOrEqual,
  LessOrEqual,
  Contains,
  NotContains,
}

impl Operator {
  pub fn as_str(&self) -> &'static str {
    match self {
      Operator::Equals => "==",
      Operator::NotEquals => "!=",
      Operator::GreaterThan => ">",
      Operator::LessThan => "<",
      Operator::GreaterOrEqual => ">=",
      Operator::LessOrEqual => "<=",
      Operator::Contains => "contains",
      Operator::NotContains => "not_contains",
    }
  }

  pub fn apply(&self, left: &str, right: &str) -> bool {
    match self {
      Operator::Equals => left == right,
      Operator::NotEquals => left != right,
      Operator::GreaterThan => compare_numbers(left, right, |l, r| l > r),
      Operator::LessThan => compare_numbers(left, right, |l, r| l < r),
      Operator::GreaterOrEqual => compare_numbers(left, right, |l, r| l >= r),
      Operator::LessOrEqual => compare_numbers(left, right, |l, r| l <= r),
      Operator::Contains => left.contains(right),
      Operator::NotContains => !left.contains(right),
    }
  }
}

impl FromStr for Operator {
  type Err = NodeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "==" | "equals" => Ok(Operator::Equals),
      "!=" | "not_equals" => Ok(Operator::NotEquals),
      ">" => Ok(Operator::GreaterThan),
      "<" => Ok(Operator::LessThan),
      ">=" => Ok(Operator::GreaterOrEqual),
      "<=" => Ok(Operator::LessOrEqual),
      "contains" => Ok(Operator::Contains),
      "not_contains" => Ok(Operator::NotContains),
      other => Err(NodeError::UnknownOperator(other.to_string())),
    }
  }
}

fn compare_numbers(left: &str, right: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
  match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
    (Ok(l), Ok(r)) => cmp(l, r),
    _ => false,
  }
}

pub fn execute(config: &Value, scope: &Scope<'_>) -> Result<Value, NodeError> {
  let empty = Map::new();
  let config = match config {
    Value::Null => &empty,
    Value::Object(map) => map,
    other => {
      return Err(NodeError::malformed(
        "condition",
        format!("expected an object, got {}", type_name(other)),
      ));
    }
  };

  let field = match config.get("field") {
    None | Some(Value::Null) => "",
    Some(Value::String(s)) => s.as_str(),
    Some(other) => {
      return Err(NodeError::malformed(
        "condition",
        format!("field must be a string, got {}", type_name(other)),
      ));
    }
  };

  let operator = match config.get("operator") {
    None | Some(Value::Null) => Operator::Equals,
    Some(Value::String(s)) => s.parse()?,
    Some(other) => {
      return Err(NodeError::malformed(
        "condition",
        format!("operator must be a string, got {}", type_name(other)),
      ));
    }
  };

  // An empty field compares the whole upstream output.
  let left = if field.trim().is_empty() {
    scope.prev()
  } else {
    scope.resolve(field)
  }
  .cloned()
  .unwrap_or(Value::Null);

  let right = match config.get("value") {
    Some(Value::String(s)) => Value::String(interpolate(s, scope)),
    Some(other) => other.clone(),
    None => Value::Null,
  };

  let pass = operator.apply(&operand(&left), &operand(&right));

  Ok(json!({
    "pass": pass,
    "left": left,
    "operator": operator.as_str(),
    "right": right,
  }))
}

fn operand(value: &Value) -> String {
  match value {
    Value::Null => "\"\"".to_string(),
    other => render(Some(other)),
  }
}
