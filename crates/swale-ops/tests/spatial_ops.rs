use pretty_assertions::assert_eq;
use swale_model::{
    Field, FieldType, FeatureClass, Geometry, GeometryKind, Point, Predicate, Schema, Value,
};
use swale_ops::{fill_field_if_intersects, fill_field_within_distance, copy_field_from_overlap};

fn square(x0: f64, y0: f64, size: f64) -> Geometry {
    Geometry::Polygon(vec![vec![
        Point::new(x0, y0),
        Point::new(x0 + size, y0),
        Point::new(x0 + size, y0 + size),
        Point::new(x0, y0 + size),
    ]])
}

fn point_class(name: &str, rows: &[(Option<(f64, f64)>, Vec<Value>)], fields: Vec<Field>) -> FeatureClass {
    let schema = Schema::new(fields).unwrap();
    let mut fc = FeatureClass::new(name, Some(GeometryKind::Point), schema).unwrap();
    for (coords, values) in rows {
        let geometry = coords.map(|(x, y)| Geometry::Point(Point::new(x, y)));
        fc.insert(geometry, values.clone()).unwrap();
    }
    fc
}

fn polygon_class(name: &str, rows: &[(Geometry, Vec<Value>)], fields: Vec<Field>) -> FeatureClass {
    let schema = Schema::new(fields).unwrap();
    let mut fc = FeatureClass::new(name, Some(GeometryKind::Polygon), schema).unwrap();
    for (geometry, values) in rows {
        fc.insert(Some(geometry.clone()), values.clone()).unwrap();
    }
    fc
}

#[test]
fn intersecting_records_get_the_constant() {
    let mut outfalls = point_class(
        "of_points",
        &[
            (Some((5.0, 5.0)), vec![Value::Null]),
            (Some((50.0, 50.0)), vec![Value::Null]),
            (None, vec![Value::Null]),
        ],
        vec![Field::new("MS4", FieldType::SmallInteger)],
    );
    let boundaries = polygon_class(
        "ms4_bounds",
        &[(square(0.0, 0.0, 10.0), vec![])],
        vec![],
    );

    let updated =
        fill_field_if_intersects(&mut outfalls, &boundaries, "MS4", &Value::Integer(1)).unwrap();
    assert_eq!(updated, 1);

    let values: Vec<_> = outfalls.features().map(|f| f.value(0).clone()).collect();
    assert_eq!(values, vec![Value::Integer(1), Value::Null, Value::Null]);
}

#[test]
fn overlap_copy_stages_by_key_and_keeps_first_match() {
    let bounds_fields = vec![
        Field::new("Index_ID", FieldType::Integer),
        Field::new("Acres_IND", FieldType::Double),
    ];
    let mut bounds = polygon_class(
        "of_bounds",
        &[
            (square(0.0, 0.0, 10.0), vec![Value::Integer(1), Value::Null]),
            (square(100.0, 100.0, 10.0), vec![Value::Integer(2), Value::Double(0.0)]),
        ],
        bounds_fields,
    );

    // Two zoning polygons overlap boundary 1; the first in collection order
    // wins. Nothing overlaps boundary 2.
    let zoning = polygon_class(
        "zoning_diss",
        &[
            (square(2.0, 2.0, 3.0), vec![Value::Double(4.25)]),
            (square(6.0, 6.0, 3.0), vec![Value::Double(9.0)]),
        ],
        vec![Field::new("Acres_calc", FieldType::Double)],
    );

    let updated =
        copy_field_from_overlap(&mut bounds, "Acres_IND", "Index_ID", &zoning, "Acres_calc")
            .unwrap();
    assert_eq!(updated, 1);

    let values: Vec<_> = bounds.features().map(|f| f.value(1).clone()).collect();
    assert_eq!(values, vec![Value::Double(4.25), Value::Double(0.0)]);
}

#[test]
fn overlap_copy_skips_null_overlap_values() {
    let mut bounds = polygon_class(
        "of_bounds",
        &[(square(0.0, 0.0, 10.0), vec![Value::Integer(1), Value::Double(7.0)])],
        vec![
            Field::new("Index_ID", FieldType::Integer),
            Field::new("Acres_IND", FieldType::Double),
        ],
    );
    let zoning = polygon_class(
        "zoning_diss",
        &[(square(2.0, 2.0, 3.0), vec![Value::Null])],
        vec![Field::new("Acres_calc", FieldType::Double)],
    );

    let updated =
        copy_field_from_overlap(&mut bounds, "Acres_IND", "Index_ID", &zoning, "Acres_calc")
            .unwrap();
    assert_eq!(updated, 0);
    assert_eq!(
        bounds.features().next().unwrap().value(1),
        &Value::Double(7.0)
    );
}

#[test]
fn within_distance_respects_filter_and_radius() {
    let mut facilities = point_class(
        "facilities",
        &[
            (Some((0.0, 0.0)), vec![Value::Text("UIC".into()), Value::Null]),
            (Some((3.0, 0.0)), vec![Value::Text("UIC".into()), Value::Null]),
            (Some((0.0, 1.0)), vec![Value::Text("Outfall".into()), Value::Null]),
            (Some((100.0, 0.0)), vec![Value::Text("UIC".into()), Value::Null]),
        ],
        vec![
            Field::new("Facility", FieldType::Text { length: 10 }),
            Field::new("Nearest_Hansen", FieldType::Text { length: 10 }),
        ],
    );
    let mains = point_class("mains", &[(Some((1.0, 0.0)), vec![])], vec![]);

    let filter = Predicate::equals("Facility", "UIC");
    let updated = fill_field_within_distance(
        &mut facilities,
        &filter,
        &mains,
        2.5,
        "Nearest_Hansen",
        &Value::Text("AAA111".into()),
    )
    .unwrap();
    assert_eq!(updated, 2);

    let values: Vec<_> = facilities.features().map(|f| f.value(1).clone()).collect();
    assert_eq!(
        values,
        vec![
            Value::Text("AAA111".into()),
            Value::Text("AAA111".into()),
            Value::Null,
            Value::Null,
        ]
    );
}
