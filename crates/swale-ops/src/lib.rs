//! `swale-ops` implements the attribute-transfer toolbox: schema reshaping
//! (reorder/rename), constant and conditional fills, key-based cross-dataset
//! copies, spatial-overlap fills, and sequential id assignment.
//!
//! Operations either mutate a collection in place through its update cursor,
//! or — for schema changes, which the underlying store model cannot do in
//! place — build and return a new output collection. Failures surface
//! immediately as `Err`; there is no retry or partial-completion bookkeeping,
//! so a failed step leaves its collection exactly as the last completed write
//! left it.

mod fill;
mod join;
mod schema;
mod sequence;
mod spatial;

use thiserror::Error;

use swale_model::{DatasetError, SchemaError};

/// Errors raised by toolbox operations.
#[derive(Debug, Error)]
pub enum OpError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// A filter predicate referenced a field the collection does not have.
    #[error(transparent)]
    Filter(#[from] SchemaError),
    #[error("field {field:?} in {dataset} is not numeric")]
    NotNumeric { dataset: String, field: String },
}

pub type Result<T> = std::result::Result<T, OpError>;

pub use fill::{copy_field, fill_field, fill_field_where};
pub use join::{
    copy_field_by_key, copy_fields_by_key, fill_field_from_map, key_map, sum_double_by_key,
};
pub use schema::{add_fields, rename_fields, reorder_fields, UnlistedFields};
pub use sequence::{assign_sequential_ids, assign_sequential_ids_by};
pub use spatial::{
    copy_field_from_overlap, fill_field_if_intersects, fill_field_within_distance,
};
