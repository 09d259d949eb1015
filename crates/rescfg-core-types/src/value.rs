use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrType {
    String,
    Int,
    Boolean,
    List,
    Object,
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttrType::String => "STRING",
            AttrType::Int => "INT",
            AttrType::Boolean => "BOOLEAN",
            AttrType::List => "LIST",
            AttrType::Object => "OBJECT",
        };
        write!(f, "{}", name)
    }
}

/// A typed attribute value
///
/// `Undefined` is an explicit state, distinct from an absent map entry, so
/// transformation rules can discard or reject on "defined vs undefined"
/// without consulting the schema. `Expression` carries a deferred-evaluation
/// string ("${env.PORT}"); this engine never evaluates expressions, it only
/// gates them on the owning attribute's `allow_expression` flag.
///
/// Object keys use a `BTreeMap` for deterministic serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Undefined,
    Expression(String),
    String(String),
    Int(i64),
    Boolean(bool),
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Whether this value is defined (anything but `Undefined`)
    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Undefined)
    }

    /// Whether this value is a deferred expression
    pub fn is_expression(&self) -> bool {
        matches!(self, Value::Expression(_))
    }

    /// The declared type this literal value conforms to
    ///
    /// Returns None for `Undefined` and `Expression`, which conform to any
    /// declared type (expressions are type-checked at evaluation time by
    /// the host, not here).
    pub fn attr_type(&self) -> Option<AttrType> {
        match self {
            Value::Undefined | Value::Expression(_) => None,
            Value::String(_) => Some(AttrType::String),
            Value::Int(_) => Some(AttrType::Int),
            Value::Boolean(_) => Some(AttrType::Boolean),
            Value::List(_) => Some(AttrType::List),
            Value::Object(_) => Some(AttrType::Object),
        }
    }

    /// Convert a `serde_json::Value` into a typed attribute value
    ///
    /// JSON strings of the form "${...}" become expressions; JSON null maps
    /// to `Undefined`. Floats are not part of the attribute type system and
    /// are truncated to Int.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Undefined,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => Value::Int(n.as_i64().unwrap_or(0)),
            serde_json::Value::String(s) => {
                if s.starts_with("${") && s.ends_with('}') {
                    Value::Expression(s.clone())
                } else {
                    Value::String(s.clone())
                }
            }
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert this value to a `serde_json::Value` for display and export
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined => serde_json::Value::Null,
            Value::Expression(s) | Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defined_and_expression() {
        assert!(!Value::Undefined.is_defined());
        assert!(Value::Int(0).is_defined());
        assert!(Value::Expression("${port}".to_string()).is_expression());
        assert!(!Value::String("literal".to_string()).is_expression());
    }

    #[test]
    fn test_attr_type() {
        assert_eq!(Value::from("x").attr_type(), Some(AttrType::String));
        assert_eq!(Value::Int(1).attr_type(), Some(AttrType::Int));
        assert_eq!(Value::Boolean(true).attr_type(), Some(AttrType::Boolean));
        assert_eq!(Value::Undefined.attr_type(), None);
        assert_eq!(
            Value::Expression("${x}".to_string()).attr_type(),
            None
        );
    }

    #[test]
    fn test_json_round_trip() {
        let json = serde_json::json!({
            "quorum": 1,
            "cache": "default",
            "enabled": true,
            "channel": null,
            "hosts": ["a", "b"],
        });
        let value = Value::from_json(&json);
        assert_eq!(value.to_json(), serde_json::json!({
            "quorum": 1,
            "cache": "default",
            "enabled": true,
            "channel": null,
            "hosts": ["a", "b"],
        }));
    }

    #[test]
    fn test_json_expression_detection() {
        let value = Value::from_json(&serde_json::json!("${jboss.default.multicast.address}"));
        assert!(value.is_expression());
    }
}
