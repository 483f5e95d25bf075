use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A value bound to a name in a render context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Number(Decimal),
    Bool(bool),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// String form used for interpolation.
    ///
    /// Lists and maps have no scalar form and interpolate as empty.
    pub fn as_display_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::List(_) | Value::Map(_) => String::new(),
        }
    }

    /// Truthiness for bare-name conditionals: non-empty non-"false"/"0"
    /// strings, non-zero numbers, `true`, non-empty lists/maps.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty() && s != "false" && s != "0",
            Value::Number(n) => !n.is_zero(),
            Value::Bool(b) => *b,
            Value::List(items) => !items.is_empty(),
            Value::Map(fields) => !fields.is_empty(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Decimal> for Value {
    fn from(n: Decimal) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::Map(fields)
    }
}
