//! Schema reshaping: field reorder and rename.
//!
//! Both produce a new output collection; the store model cannot change a
//! schema in place. Requested field names must already exist in the source or
//! the operation fails before any output is built.

use swale_model::{DatasetError, Field, FeatureClass, Schema};

use crate::Result;

/// What happens to source fields that a reorder did not list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlistedFields {
    /// Append them after the listed fields, in their original order.
    Append,
    /// Leave them out of the output. Listing only the fields to keep makes
    /// this a bulk field-deletion mechanism.
    Drop,
}

/// Builds a copy of `source` with its fields in `field_order`.
///
/// Object ids are reassigned in the output; record order and geometry carry
/// over unchanged.
pub fn reorder_fields(
    source: &FeatureClass,
    field_order: &[&str],
    unlisted: UnlistedFields,
) -> Result<FeatureClass> {
    let mut indices = Vec::with_capacity(source.schema().len());
    let mut listed = vec![false; source.schema().len()];
    for name in field_order {
        let index = source.field_index(name)?;
        indices.push(index);
        listed[index] = true;
    }
    if unlisted == UnlistedFields::Append {
        for (index, seen) in listed.iter().enumerate() {
            if !seen {
                indices.push(index);
            }
        }
    }

    let fields: Vec<Field> = indices
        .iter()
        .map(|&i| source.schema().fields()[i].clone())
        .collect();
    copy_with_schema(source, fields, &indices)
}

/// Builds a copy of `source` with fields renamed per `(old, new)` pairs.
///
/// Both the name and the display alias change; unmapped fields pass through
/// untouched. A new name that collides with any other output field is an
/// error.
pub fn rename_fields(source: &FeatureClass, renames: &[(&str, &str)]) -> Result<FeatureClass> {
    let mut fields = source.schema().fields().to_vec();
    for (old, new) in renames {
        let index = source.field_index(old)?;
        fields[index].name = new.to_string();
        fields[index].alias = new.to_string();
    }
    let identity: Vec<usize> = (0..fields.len()).collect();
    copy_with_schema(source, fields, &identity)
}

/// Appends a batch of fields to a collection, each back-filled with nulls.
pub fn add_fields(fc: &mut FeatureClass, fields: impl IntoIterator<Item = Field>) -> Result<()> {
    for field in fields {
        fc.add_field(field)?;
    }
    Ok(())
}

fn copy_with_schema(
    source: &FeatureClass,
    fields: Vec<Field>,
    indices: &[usize],
) -> Result<FeatureClass> {
    let schema = Schema::new(fields).map_err(|err| DatasetError::Schema {
        dataset: source.name().to_string(),
        source: err,
    })?;
    let mut out = FeatureClass::new(source.name(), source.geometry_kind(), schema)?;
    for feature in source.features() {
        let values = indices.iter().map(|&i| feature.value(i).clone()).collect();
        out.insert(feature.geometry().cloned(), values)?;
    }
    Ok(out)
}
