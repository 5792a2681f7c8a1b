use std::fmt;

use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Attribute value held by a feature-class field.
///
/// The enum uses an explicit `{type, value}` tagged layout so datasets stay
/// JSON-safe across process boundaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Null / unset field value.
    Null,
    /// 64-bit integer.
    Integer(i64),
    /// IEEE-754 double precision number.
    Double(f64),
    /// Plain text.
    Text(String),
    /// Date with time-of-day, no timezone (geodatabase `DATE` semantics).
    Date(NaiveDateTime),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    /// Returns true if the value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Hashable lookup key used to stage join-style operations.
    ///
    /// Null values have no key: every mapping builder skips them, so a null
    /// key can never match a target row.
    pub fn key(&self) -> Option<KeyValue> {
        match self {
            Value::Null => None,
            Value::Integer(v) => Some(KeyValue::Integer(*v)),
            Value::Double(v) => Some(KeyValue::Double(OrderedFloat(*v))),
            Value::Text(v) => Some(KeyValue::Text(v.clone())),
            Value::Date(v) => Some(KeyValue::Date(*v)),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("<null>"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Hashable form of a non-null [`Value`].
///
/// Doubles are wrapped in [`OrderedFloat`] so they can participate in lookup
/// tables; the ordering is also used when a caller asks for an explicit sort
/// key (mixed-type fields sort by variant first).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    Integer(i64),
    Double(OrderedFloat<f64>),
    Text(String),
    Date(NaiveDateTime),
}

/// Equality used by filter predicates: numeric values compare across the
/// `Integer`/`Double` divide, everything else compares within its own type.
/// Null never equals anything, including another null.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => match (a, b) {
            (Value::Text(x), Value::Text(y)) => x == y,
            (Value::Date(x), Value::Date(y)) => x == y,
            _ => false,
        },
    }
}
