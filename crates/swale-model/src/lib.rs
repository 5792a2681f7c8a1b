//! `swale-model` defines the core in-memory feature-class data structures.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the operations layer (schema reshaping, joins, spatial fills)
//! - the workspace/store layer
//! - import pipelines and process boundaries via `serde` (JSON-safe schema)

mod feature;
mod field;
pub mod filter;
mod geometry;
pub mod import;
mod sanitize;
mod value;

pub use feature::{
    DatasetError, Feature, FeatureClass, SearchCursor, SearchRow, UpdateCursor, UpdateRow,
};
pub use field::{Field, FieldType, Schema, SchemaError, ValidationError};
pub use filter::{NumberComparison, Predicate};
pub use geometry::{Envelope, Geometry, GeometryKind, Point};
pub use import::{feature_class_from_csv, CsvImportError, CsvOptions};
pub use sanitize::sanitize_name;
pub use value::{KeyValue, Value};
