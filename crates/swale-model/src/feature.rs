use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Field, Geometry, GeometryKind, Schema, SchemaError, ValidationError, Value};

/// Errors raised when creating or mutating a feature class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("dataset name cannot be empty")]
    EmptyName,
    #[error("field {field:?} not in {dataset}")]
    UnknownField { field: String, dataset: String },
    #[error("{dataset}: {source}")]
    Schema {
        dataset: String,
        source: SchemaError,
    },
    #[error("{dataset}: {source}")]
    Validation {
        dataset: String,
        source: ValidationError,
    },
    #[error("{dataset} expects {expected} attribute values, got {got}")]
    ValueCountMismatch {
        dataset: String,
        expected: usize,
        got: usize,
    },
    #[error("{dataset} holds {expected:?} geometry, got {got:?}")]
    GeometryKindMismatch {
        dataset: String,
        expected: Option<GeometryKind>,
        got: GeometryKind,
    },
}

/// A single record: a stable object id, an optional shape, and one attribute
/// value per schema field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    oid: u64,
    geometry: Option<Geometry>,
    values: Vec<Value>,
}

impl Feature {
    /// Store-assigned object id. Stable for the lifetime of the collection,
    /// not preserved across derived outputs.
    pub fn oid(&self) -> u64 {
        self.oid
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Attribute value at a schema position.
    pub fn value(&self, index: usize) -> &Value {
        &self.values[index]
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A named dataset of records with a fixed field schema, optionally carrying
/// geometry of a declared kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureClass {
    name: String,
    geometry_kind: Option<GeometryKind>,
    schema: Schema,
    features: Vec<Feature>,
    next_oid: u64,
}

impl FeatureClass {
    /// Creates an empty collection. `geometry_kind` of `None` makes a plain
    /// attribute table.
    pub fn new(
        name: impl Into<String>,
        geometry_kind: Option<GeometryKind>,
        schema: Schema,
    ) -> Result<Self, DatasetError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DatasetError::EmptyName);
        }
        Ok(Self {
            name,
            geometry_kind,
            schema,
            features: Vec::new(),
            next_oid: 1,
        })
    }

    /// Plain attribute table without geometry.
    pub fn table(name: impl Into<String>, schema: Schema) -> Result<Self, DatasetError> {
        Self::new(name, None, schema)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), DatasetError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DatasetError::EmptyName);
        }
        self.name = name;
        Ok(())
    }

    pub fn geometry_kind(&self) -> Option<GeometryKind> {
        self.geometry_kind
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Records in the collection's current order.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Position of `field` in the schema, with dataset context on failure.
    pub fn field_index(&self, field: &str) -> Result<usize, DatasetError> {
        self.schema
            .field_index(field)
            .map_err(|_| DatasetError::UnknownField {
                field: field.to_string(),
                dataset: self.name.clone(),
            })
    }

    /// Validates and appends a record, returning its object id.
    pub fn insert(
        &mut self,
        geometry: Option<Geometry>,
        values: Vec<Value>,
    ) -> Result<u64, DatasetError> {
        if values.len() != self.schema.len() {
            return Err(DatasetError::ValueCountMismatch {
                dataset: self.name.clone(),
                expected: self.schema.len(),
                got: values.len(),
            });
        }
        if let Some(geom) = &geometry {
            if self.geometry_kind != Some(geom.kind()) {
                return Err(DatasetError::GeometryKindMismatch {
                    dataset: self.name.clone(),
                    expected: self.geometry_kind,
                    got: geom.kind(),
                });
            }
        }
        for (field, value) in self.schema.fields().iter().zip(&values) {
            field.validate(value).map_err(|source| DatasetError::Validation {
                dataset: self.name.clone(),
                source,
            })?;
        }
        let oid = self.next_oid;
        self.next_oid += 1;
        self.features.push(Feature {
            oid,
            geometry,
            values,
        });
        Ok(oid)
    }

    /// Appends a field to the schema; existing records are back-filled with
    /// nulls.
    pub fn add_field(&mut self, field: Field) -> Result<(), DatasetError> {
        self.schema.push(field).map_err(|source| DatasetError::Schema {
            dataset: self.name.clone(),
            source,
        })?;
        for feature in &mut self.features {
            feature.values.push(Value::Null);
        }
        Ok(())
    }

    /// Read-only cursor over the named fields.
    ///
    /// Field names are resolved before iteration starts, so a missing field
    /// fails here rather than mid-scan.
    pub fn search(&self, fields: &[&str]) -> Result<SearchCursor<'_>, DatasetError> {
        let indices = self.resolve(fields)?;
        Ok(SearchCursor {
            iter: self.features.iter(),
            indices,
        })
    }

    /// Read-write cursor over the named fields. Writes are validated against
    /// the schema as they happen.
    pub fn update(&mut self, fields: &[&str]) -> Result<UpdateCursor<'_>, DatasetError> {
        let indices = self.resolve(fields)?;
        Ok(UpdateCursor {
            dataset: &self.name,
            schema: &self.schema,
            iter: self.features.iter_mut(),
            indices,
        })
    }

    fn resolve(&self, fields: &[&str]) -> Result<Vec<usize>, DatasetError> {
        fields.iter().map(|f| self.field_index(f)).collect()
    }
}

/// Sequential read handle over a feature class.
pub struct SearchCursor<'a> {
    iter: std::slice::Iter<'a, Feature>,
    indices: Vec<usize>,
}

impl<'a> SearchCursor<'a> {
    pub fn next_row(&mut self) -> Option<SearchRow<'a, '_>> {
        let feature = self.iter.next()?;
        Some(SearchRow {
            feature,
            indices: &self.indices,
        })
    }
}

/// One row yielded by a [`SearchCursor`]; values are addressed by the
/// position of the field in the cursor's field list.
pub struct SearchRow<'a, 'c> {
    feature: &'a Feature,
    indices: &'c [usize],
}

impl<'a> SearchRow<'a, '_> {
    pub fn oid(&self) -> u64 {
        self.feature.oid()
    }

    pub fn geometry(&self) -> Option<&'a Geometry> {
        self.feature.geometry()
    }

    pub fn get(&self, slot: usize) -> &'a Value {
        self.feature.value(self.indices[slot])
    }
}

/// Sequential read-write handle over a feature class.
///
/// The exclusive borrow it holds is the analogue of an update lock on the
/// underlying store: it is released on every exit path, including early
/// returns and panics, when the cursor goes out of scope.
pub struct UpdateCursor<'a> {
    dataset: &'a str,
    schema: &'a Schema,
    iter: std::slice::IterMut<'a, Feature>,
    indices: Vec<usize>,
}

impl<'a> UpdateCursor<'a> {
    pub fn next_row(&mut self) -> Option<UpdateRow<'a, '_>> {
        let feature = self.iter.next()?;
        Some(UpdateRow {
            dataset: self.dataset,
            schema: self.schema,
            feature,
            indices: &self.indices,
        })
    }
}

/// One writable row yielded by an [`UpdateCursor`].
pub struct UpdateRow<'a, 'c> {
    dataset: &'a str,
    schema: &'a Schema,
    feature: &'a mut Feature,
    indices: &'c [usize],
}

impl UpdateRow<'_, '_> {
    pub fn oid(&self) -> u64 {
        self.feature.oid()
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.feature.geometry()
    }

    /// Read-only view of the whole record (for predicate evaluation).
    pub fn feature(&self) -> &Feature {
        self.feature
    }

    pub fn get(&self, slot: usize) -> &Value {
        self.feature.value(self.indices[slot])
    }

    /// Writes `value` into the cursor field at `slot`, validating it against
    /// the schema first.
    pub fn set(&mut self, slot: usize, value: Value) -> Result<(), DatasetError> {
        let index = self.indices[slot];
        self.schema.fields()[index]
            .validate(&value)
            .map_err(|source| DatasetError::Validation {
                dataset: self.dataset.to_string(),
                source,
            })?;
        self.feature.values[index] = value;
        Ok(())
    }
}
