use pretty_assertions::assert_eq;
use swale_model::{Field, FieldType, FeatureClass, Schema, Value};
use swale_store::{copy_dataset, Overwrite, StoreError, Workspace};

fn dataset(name: &str) -> FeatureClass {
    let schema = Schema::new(vec![Field::new("Index_ID", FieldType::Integer)]).unwrap();
    let mut fc = FeatureClass::table(name, schema).unwrap();
    fc.insert(None, vec![Value::Integer(1)]).unwrap();
    fc
}

#[test]
fn insert_respects_overwrite_flag() {
    let mut ws = Workspace::new("working").unwrap();
    ws.insert(dataset("of_points_copy"), Overwrite::Deny).unwrap();

    let err = ws
        .insert(dataset("of_points_copy"), Overwrite::Deny)
        .unwrap_err();
    assert_eq!(err, StoreError::DatasetExists("of_points_copy".into()));

    ws.insert(dataset("of_points_copy"), Overwrite::Allow).unwrap();
    assert_eq!(ws.len(), 1);
}

#[test]
fn dataset_names_must_be_store_safe() {
    let mut ws = Workspace::new("working").unwrap();
    let err = ws.insert(dataset("of points"), Overwrite::Deny).unwrap_err();
    assert_eq!(err, StoreError::InvalidDatasetName("of points".into()));
}

#[test]
fn names_are_sorted_and_lookup_errors_name_the_dataset() {
    let mut ws = Workspace::new("working").unwrap();
    ws.insert(dataset("wsheds_copy"), Overwrite::Deny).unwrap();
    ws.insert(dataset("of_bounds_copy"), Overwrite::Deny).unwrap();
    assert_eq!(ws.names(), vec!["of_bounds_copy", "wsheds_copy"]);

    assert_eq!(
        ws.dataset("of_points_copy").unwrap_err(),
        StoreError::DatasetNotFound("of_points_copy".into())
    );
}

#[test]
fn copy_dataset_snapshots_independently() {
    let mut src = Workspace::new("editors").unwrap();
    src.insert(dataset("of_points"), Overwrite::Deny).unwrap();

    let mut dst = Workspace::new("working").unwrap();
    copy_dataset(&src, "of_points", &mut dst, "of_points_copy", Overwrite::Deny).unwrap();

    // Mutating the copy leaves the source untouched.
    dst.dataset_mut("of_points_copy")
        .unwrap()
        .insert(None, vec![Value::Integer(2)])
        .unwrap();
    assert_eq!(src.dataset("of_points").unwrap().len(), 1);
    assert_eq!(dst.dataset("of_points_copy").unwrap().len(), 2);
}

#[test]
fn remove_returns_the_dataset() {
    let mut ws = Workspace::new("working").unwrap();
    ws.insert(dataset("of_points"), Overwrite::Deny).unwrap();
    let fc = ws.remove("of_points").unwrap();
    assert_eq!(fc.name(), "of_points");
    assert!(ws.is_empty());
}
