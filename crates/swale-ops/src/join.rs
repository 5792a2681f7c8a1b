//! Key-based cross-collection copies.
//!
//! The staging pattern is shared by every variant: build an in-memory map
//! from a key field to a value field (non-null keys only, last write wins
//! when keys repeat), then overwrite the target field on rows whose key is
//! mapped — but only with non-null mapped values, so a null on the source
//! side never clobbers data the target already has. This stands in for a
//! relational join the underlying store cannot express.

use std::collections::HashMap;

use swale_model::{FeatureClass, FieldType, KeyValue, Value};

use crate::{OpError, Result};

/// Builds the staging map for a key-based copy: every non-null key in
/// `source` mapped to its row's `value_field`. Keys that repeat keep the
/// last row's value.
pub fn key_map(
    source: &FeatureClass,
    key_field: &str,
    value_field: &str,
) -> Result<HashMap<KeyValue, Value>> {
    let mut values = HashMap::new();
    let mut cursor = source.search(&[key_field, value_field])?;
    while let Some(row) = cursor.next_row() {
        if let Some(key) = row.get(0).key() {
            values.insert(key, row.get(1).clone());
        }
    }
    Ok(values)
}

/// Applies a staged map to `target`: rows whose `key_field` appears in the
/// map get `target_field` overwritten with the mapped value, unless that
/// value is null. Returns the number of rows written.
pub fn fill_field_from_map(
    target: &mut FeatureClass,
    key_field: &str,
    target_field: &str,
    values: &HashMap<KeyValue, Value>,
) -> Result<usize> {
    log::info!("populating the {target_field} field for {}", target.name());
    let mut updated = 0;
    let mut cursor = target.update(&[key_field, target_field])?;
    while let Some(mut row) = cursor.next_row() {
        let Some(key) = row.get(0).key() else {
            continue;
        };
        if let Some(value) = values.get(&key) {
            if !value.is_null() {
                row.set(1, value.clone())?;
                updated += 1;
            }
        }
    }
    Ok(updated)
}

/// Copies `source_field` values into `target_field` wherever the two
/// collections share a key — the fast substitute for a table join.
pub fn copy_field_by_key(
    source: &FeatureClass,
    source_key: &str,
    source_field: &str,
    target: &mut FeatureClass,
    target_key: &str,
    target_field: &str,
) -> Result<usize> {
    log::info!(
        "copying {source_field} from {} to {} via {source_key}",
        source.name(),
        target.name()
    );
    let values = key_map(source, source_key, source_field)?;
    fill_field_from_map(target, target_key, target_field, &values)
}

/// Batch variant of [`copy_field_by_key`] for several fields sharing one key
/// link. Fields missing from the target are created from the source field
/// definitions before copying; fields that already exist are overwritten.
pub fn copy_fields_by_key(
    source: &FeatureClass,
    source_key: &str,
    fields: &[&str],
    target: &mut FeatureClass,
    target_key: &str,
) -> Result<usize> {
    let mut updated = 0;
    for field in fields {
        let index = source.field_index(field)?;
        if !target.schema().contains(field) {
            target.add_field(source.schema().fields()[index].clone())?;
        }
        updated += copy_field_by_key(source, source_key, field, target, target_key, field)?;
    }
    Ok(updated)
}

/// Sums a numeric field per key, e.g. to total overlap acreage by boundary
/// id before applying it with [`fill_field_from_map`]. Null keys and null
/// values are skipped.
pub fn sum_double_by_key(
    fc: &FeatureClass,
    key_field: &str,
    value_field: &str,
) -> Result<HashMap<KeyValue, f64>> {
    let index = fc.field_index(value_field)?;
    let field = &fc.schema().fields()[index];
    if !matches!(
        field.field_type,
        FieldType::SmallInteger | FieldType::Integer | FieldType::Double
    ) {
        return Err(OpError::NotNumeric {
            dataset: fc.name().to_string(),
            field: value_field.to_string(),
        });
    }

    let mut sums = HashMap::new();
    let mut cursor = fc.search(&[key_field, value_field])?;
    while let Some(row) = cursor.next_row() {
        let Some(key) = row.get(0).key() else {
            continue;
        };
        if let Some(value) = row.get(1).as_f64() {
            *sums.entry(key).or_insert(0.0) += value;
        }
    }
    Ok(sums)
}
