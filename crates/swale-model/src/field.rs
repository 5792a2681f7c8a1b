use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Value;

/// Storage type of a feature-class field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// 32-bit integer ("SHORT" in most geodatabases).
    SmallInteger,
    /// 64-bit integer ("LONG").
    Integer,
    /// IEEE-754 double.
    Double,
    /// Text with a maximum length in characters.
    Text { length: u32 },
    /// Date with time-of-day.
    Date,
}

impl FieldType {
    /// Default geodatabase text width.
    pub const DEFAULT_TEXT_LENGTH: u32 = 255;

    pub fn text() -> Self {
        FieldType::Text {
            length: Self::DEFAULT_TEXT_LENGTH,
        }
    }
}

/// Errors raised when building or querying a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field name cannot be empty")]
    EmptyFieldName,
    #[error("duplicate field name {0:?}")]
    DuplicateField(String),
    #[error("unknown field {0:?}")]
    UnknownField(String),
}

/// Errors raised when a value does not fit a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field {field:?} does not accept {got}")]
    TypeMismatch { field: String, got: &'static str },
    #[error("field {field:?} holds at most {max} characters, got {len}")]
    TextTooLong { field: String, max: u32, len: usize },
    #[error("value {value} out of range for small-integer field {field:?}")]
    SmallIntegerOverflow { field: String, value: i64 },
    #[error("field {field:?} does not allow nulls")]
    NullNotAllowed { field: String },
}

/// A named, typed attribute column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Display label; follows the name unless set separately.
    pub alias: String,
    pub field_type: FieldType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
            field_type,
            nullable: true,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Checks that `value` can be stored in this field.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let mismatch = |got: &'static str| ValidationError::TypeMismatch {
            field: self.name.clone(),
            got,
        };
        match (self.field_type, value) {
            (_, Value::Null) => {
                if self.nullable {
                    Ok(())
                } else {
                    Err(ValidationError::NullNotAllowed {
                        field: self.name.clone(),
                    })
                }
            }
            (FieldType::SmallInteger, Value::Integer(v)) => {
                if i32::try_from(*v).is_ok() {
                    Ok(())
                } else {
                    Err(ValidationError::SmallIntegerOverflow {
                        field: self.name.clone(),
                        value: *v,
                    })
                }
            }
            (FieldType::Integer, Value::Integer(_)) => Ok(()),
            (FieldType::Double, Value::Double(_) | Value::Integer(_)) => Ok(()),
            (FieldType::Text { length }, Value::Text(text)) => {
                let len = text.chars().count();
                if len <= length as usize {
                    Ok(())
                } else {
                    Err(ValidationError::TextTooLong {
                        field: self.name.clone(),
                        max: length,
                        len,
                    })
                }
            }
            (FieldType::Date, Value::Date(_)) => Ok(()),
            (_, Value::Integer(_)) => Err(mismatch("an integer")),
            (_, Value::Double(_)) => Err(mismatch("a double")),
            (_, Value::Text(_)) => Err(mismatch("text")),
            (_, Value::Date(_)) => Err(mismatch("a date")),
        }
    }
}

/// Ordered collection of fields.
///
/// Name lookup is case-insensitive, matching how geographic stores resolve
/// field names; the declared casing is preserved for output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Result<Self, SchemaError> {
        let mut schema = Schema::default();
        for field in fields {
            schema.push(field)?;
        }
        Ok(schema)
    }

    pub fn push(&mut self, field: Field) -> Result<(), SchemaError> {
        if field.name.is_empty() {
            return Err(SchemaError::EmptyFieldName);
        }
        if self.index_of(&field.name).is_some() {
            return Err(SchemaError::DuplicateField(field.name));
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Position of `name`, or [`SchemaError::UnknownField`].
    pub fn field_index(&self, name: &str) -> Result<usize, SchemaError> {
        self.index_of(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))
    }

    pub fn field(&self, name: &str) -> Result<&Field, SchemaError> {
        self.field_index(name).map(|i| &self.fields[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_rejected_case_insensitively() {
        let err = Schema::new(vec![
            Field::new("Basin", FieldType::text()),
            Field::new("BASIN", FieldType::Double),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("BASIN".into()));
    }

    #[test]
    fn lookup_ignores_case() {
        let schema = Schema::new(vec![Field::new("Watershed", FieldType::text())]).unwrap();
        assert_eq!(schema.field_index("watershed"), Ok(0));
        assert_eq!(
            schema.field_index("Basin"),
            Err(SchemaError::UnknownField("Basin".into()))
        );
    }

    #[test]
    fn text_length_enforced() {
        let field = Field::new("Comments", FieldType::Text { length: 3 });
        assert!(field.validate(&Value::Text("abc".into())).is_ok());
        assert_eq!(
            field.validate(&Value::Text("abcd".into())),
            Err(ValidationError::TextTooLong {
                field: "Comments".into(),
                max: 3,
                len: 4
            })
        );
    }

    #[test]
    fn double_fields_accept_integers() {
        let field = Field::new("Area_Acres", FieldType::Double);
        assert!(field.validate(&Value::Integer(4)).is_ok());
        assert!(field.validate(&Value::Text("4".into())).is_err());
    }

    #[test]
    fn non_nullable_rejects_null() {
        let field = Field::new("UID", FieldType::Integer).required();
        assert_eq!(
            field.validate(&Value::Null),
            Err(ValidationError::NullNotAllowed {
                field: "UID".into()
            })
        );
    }
}
