//! Sequential unique-id assignment.

use swale_model::{FeatureClass, KeyValue, Value};

use crate::Result;

/// Writes 1, 2, 3, … into `field` in the collection's current iteration
/// order (insertion order for this store).
///
/// That order is an artifact of how the collection was loaded, not a
/// guarantee; callers that need a deterministic numbering should use
/// [`assign_sequential_ids_by`] with an explicit sort field.
pub fn assign_sequential_ids(fc: &mut FeatureClass, field: &str) -> Result<usize> {
    log::info!("populating unique ids for {}", fc.name());
    let mut next = 1i64;
    let mut cursor = fc.update(&[field])?;
    while let Some(mut row) = cursor.next_row() {
        row.set(0, Value::Integer(next))?;
        next += 1;
    }
    Ok((next - 1) as usize)
}

/// Like [`assign_sequential_ids`], but numbering follows the ascending order
/// of `sort_field` (nulls first, stable for ties) instead of storage order.
/// Records keep their positions; only the ids reflect the sort.
pub fn assign_sequential_ids_by(
    fc: &mut FeatureClass,
    field: &str,
    sort_field: &str,
) -> Result<usize> {
    log::info!("populating unique ids for {}", fc.name());
    let sort_index = fc.field_index(sort_field)?;
    let keys: Vec<Option<KeyValue>> = fc.features().map(|f| f.value(sort_index).key()).collect();
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    let mut rank = vec![0usize; keys.len()];
    for (seq, &row) in order.iter().enumerate() {
        rank[row] = seq + 1;
    }

    let mut position = 0;
    let mut cursor = fc.update(&[field])?;
    while let Some(mut row) = cursor.next_row() {
        row.set(0, Value::Integer(rank[position] as i64))?;
        position += 1;
    }
    Ok(position)
}
