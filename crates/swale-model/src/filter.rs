//! Typed filter predicates over feature records.
//!
//! These stand in for the where-clause strings a geographic store would
//! evaluate server-side; operations that accept a filter evaluate it per
//! record against the collection's schema.

use serde::{Deserialize, Serialize};

use crate::value::values_equal;
use crate::{Feature, Schema, SchemaError, Value};

/// Comparison against a numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberComparison {
    GreaterThan(f64),
    GreaterThanOrEqual(f64),
    LessThan(f64),
    LessThanOrEqual(f64),
    Between { min: f64, max: f64 },
    NotEqual(f64),
}

impl NumberComparison {
    fn matches(&self, value: f64) -> bool {
        match *self {
            NumberComparison::GreaterThan(limit) => value > limit,
            NumberComparison::GreaterThanOrEqual(limit) => value >= limit,
            NumberComparison::LessThan(limit) => value < limit,
            NumberComparison::LessThanOrEqual(limit) => value <= limit,
            NumberComparison::Between { min, max } => value >= min && value <= max,
            NumberComparison::NotEqual(other) => value != other,
        }
    }
}

/// A filter over record attributes.
///
/// Null fields never satisfy a value comparison; use [`Predicate::IsNull`] /
/// [`Predicate::NotNull`] to test for nulls explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Equals { field: String, value: Value },
    NotEquals { field: String, value: Value },
    /// Membership test, e.g. `ZONE in ('EG1', 'EG2', 'EX')`.
    OneOf { field: String, values: Vec<Value> },
    Number { field: String, cmp: NumberComparison },
    IsNull { field: String },
    NotNull { field: String },
    /// Any sub-predicate may match (logical OR).
    Any(Vec<Predicate>),
    /// All sub-predicates must match (logical AND).
    All(Vec<Predicate>),
}

impl Predicate {
    /// Convenience constructor for the common equality case.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Convenience constructor for membership tests.
    pub fn one_of(field: impl Into<String>, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Predicate::OneOf {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Evaluates the predicate against one record.
    pub fn matches(&self, schema: &Schema, feature: &Feature) -> Result<bool, SchemaError> {
        let field_value = |name: &str| -> Result<&Value, SchemaError> {
            schema.field_index(name).map(|i| feature.value(i))
        };
        match self {
            Predicate::Equals { field, value } => Ok(values_equal(field_value(field)?, value)),
            Predicate::NotEquals { field, value } => {
                let current = field_value(field)?;
                Ok(!current.is_null() && !values_equal(current, value))
            }
            Predicate::OneOf { field, values } => {
                let current = field_value(field)?;
                Ok(values.iter().any(|v| values_equal(current, v)))
            }
            Predicate::Number { field, cmp } => Ok(field_value(field)?
                .as_f64()
                .is_some_and(|v| cmp.matches(v))),
            Predicate::IsNull { field } => Ok(field_value(field)?.is_null()),
            Predicate::NotNull { field } => Ok(!field_value(field)?.is_null()),
            Predicate::Any(preds) => {
                for pred in preds {
                    if pred.matches(schema, feature)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::All(preds) => {
                for pred in preds {
                    if !pred.matches(schema, feature)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}
