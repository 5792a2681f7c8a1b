//! Constant, conditional, and same-collection field fills.

use swale_model::{FeatureClass, Predicate, Value};

use crate::Result;

/// Sets `field` to `value` on every record. Returns the number of records
/// written.
pub fn fill_field(fc: &mut FeatureClass, field: &str, value: &Value) -> Result<usize> {
    log::info!("populating the {field} field for {}", fc.name());
    let mut updated = 0;
    let mut cursor = fc.update(&[field])?;
    while let Some(mut row) = cursor.next_row() {
        row.set(0, value.clone())?;
        updated += 1;
    }
    Ok(updated)
}

/// Sets `field` to `value` on records that match `filter` and whose `field`
/// is currently null. Records already carrying a value are left alone.
pub fn fill_field_where(
    fc: &mut FeatureClass,
    field: &str,
    value: &Value,
    filter: &Predicate,
) -> Result<usize> {
    log::info!("populating the {field} field for {}", fc.name());
    let schema = fc.schema().clone();
    let mut updated = 0;
    let mut cursor = fc.update(&[field])?;
    while let Some(mut row) = cursor.next_row() {
        if !row.get(0).is_null() {
            continue;
        }
        if filter.matches(&schema, row.feature())? {
            row.set(0, value.clone())?;
            updated += 1;
        }
    }
    Ok(updated)
}

/// Copies `source_field` into `target_field` row by row within one
/// collection.
pub fn copy_field(fc: &mut FeatureClass, target_field: &str, source_field: &str) -> Result<usize> {
    log::info!("populating the {target_field} field for {}", fc.name());
    let mut updated = 0;
    let mut cursor = fc.update(&[target_field, source_field])?;
    while let Some(mut row) = cursor.next_row() {
        let value = row.get(1).clone();
        row.set(0, value)?;
        updated += 1;
    }
    Ok(updated)
}
