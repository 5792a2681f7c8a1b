//! Spatial-overlap fills and copies.
//!
//! Candidate pairs come from an R-tree over bounding envelopes; exact
//! point/segment/ring tests confirm each candidate. Features without
//! geometry never match anything.

use std::collections::HashMap;

use rstar::{RTree, RTreeObject, AABB};

use swale_model::{Envelope, Feature, FeatureClass, Geometry, KeyValue, Point, Predicate, Value};

use crate::join::fill_field_from_map;
use crate::Result;

const EPSILON: f64 = 1e-9;

struct IndexedFeature {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedFeature {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn aabb(env: Envelope) -> AABB<[f64; 2]> {
    AABB::from_corners([env.min_x, env.min_y], [env.max_x, env.max_y])
}

fn index_features(features: &[&Feature]) -> RTree<IndexedFeature> {
    let entries = features
        .iter()
        .enumerate()
        .filter_map(|(index, feature)| {
            feature.geometry().map(|geom| IndexedFeature {
                index,
                envelope: aabb(geom.envelope()),
            })
        })
        .collect();
    RTree::bulk_load(entries)
}

/// Sets `field` to `value` on every record of `target` that spatially
/// intersects at least one record of `overlap`. Returns the number of
/// records written.
pub fn fill_field_if_intersects(
    target: &mut FeatureClass,
    overlap: &FeatureClass,
    field: &str,
    value: &Value,
) -> Result<usize> {
    log::info!(
        "populating the {field} field for {} where it overlaps {}",
        target.name(),
        overlap.name()
    );
    let overlap_features: Vec<&Feature> = overlap.features().collect();
    let tree = index_features(&overlap_features);

    let mut updated = 0;
    let mut cursor = target.update(&[field])?;
    while let Some(mut row) = cursor.next_row() {
        let hit = row.geometry().is_some_and(|geom| {
            tree.locate_in_envelope_intersecting(&aabb(geom.envelope()))
                .any(|entry| {
                    overlap_features[entry.index]
                        .geometry()
                        .is_some_and(|other| intersects(geom, other))
                })
        });
        if hit {
            row.set(0, value.clone())?;
            updated += 1;
        }
    }
    Ok(updated)
}

/// Copies `overlap_field` values into `target_field` for records of `target`
/// that intersect a record of `overlap`, keyed by the target's `key_field`.
///
/// Staging keeps the first intersecting match per key (overlap records are
/// tried in collection order); the apply step then follows the usual
/// key-based copy rules, so null overlap values never overwrite the target.
pub fn copy_field_from_overlap(
    target: &mut FeatureClass,
    target_field: &str,
    key_field: &str,
    overlap: &FeatureClass,
    overlap_field: &str,
) -> Result<usize> {
    log::info!(
        "populating the {target_field} field for {} from overlapping {}",
        target.name(),
        overlap.name()
    );
    let overlap_index = overlap.field_index(overlap_field)?;
    let overlap_features: Vec<&Feature> = overlap.features().collect();
    let tree = index_features(&overlap_features);

    let mut values: HashMap<KeyValue, Value> = HashMap::new();
    {
        let mut cursor = target.search(&[key_field])?;
        while let Some(row) = cursor.next_row() {
            let Some(key) = row.get(0).key() else {
                continue;
            };
            let Some(geom) = row.geometry() else {
                continue;
            };
            let mut candidates: Vec<usize> = tree
                .locate_in_envelope_intersecting(&aabb(geom.envelope()))
                .map(|entry| entry.index)
                .collect();
            candidates.sort_unstable();
            for index in candidates {
                let feature = overlap_features[index];
                if feature.geometry().is_some_and(|other| intersects(geom, other)) {
                    values
                        .entry(key)
                        .or_insert_with(|| feature.value(overlap_index).clone());
                    break;
                }
            }
        }
    }
    fill_field_from_map(target, key_field, target_field, &values)
}

/// Sets `field` to `value` on records of `target` that match `filter` and
/// lie within `distance` of at least one record of `near`.
pub fn fill_field_within_distance(
    target: &mut FeatureClass,
    filter: &Predicate,
    near: &FeatureClass,
    distance: f64,
    field: &str,
    value: &Value,
) -> Result<usize> {
    log::info!(
        "populating the {field} field for {} within {distance} of {}",
        target.name(),
        near.name()
    );
    let near_features: Vec<&Feature> = near.features().collect();
    let tree = index_features(&near_features);

    let schema = target.schema().clone();
    let mut updated = 0;
    let mut cursor = target.update(&[field])?;
    while let Some(mut row) = cursor.next_row() {
        if !filter.matches(&schema, row.feature())? {
            continue;
        }
        let hit = row.geometry().is_some_and(|geom| {
            let search = aabb(geom.envelope().buffered(distance));
            tree.locate_in_envelope_intersecting(&search).any(|entry| {
                near_features[entry.index]
                    .geometry()
                    .is_some_and(|other| distance_between(geom, other) <= distance)
            })
        });
        if hit {
            row.set(0, value.clone())?;
            updated += 1;
        }
    }
    Ok(updated)
}

// --- exact predicates -------------------------------------------------------

/// Segments of a shape: polyline path edges, or polygon ring edges with the
/// closing edge included.
fn segments(geom: &Geometry) -> Vec<(Point, Point)> {
    match geom {
        Geometry::Point(_) => Vec::new(),
        Geometry::Polyline(paths) => paths
            .iter()
            .flat_map(|path| path.windows(2).map(|pair| (pair[0], pair[1])))
            .collect(),
        Geometry::Polygon(rings) => rings
            .iter()
            .filter(|ring| ring.len() >= 2)
            .flat_map(|ring| {
                (0..ring.len()).map(move |i| (ring[i], ring[(i + 1) % ring.len()]))
            })
            .collect(),
    }
}

fn point_distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

fn point_segment_distance(p: Point, seg: (Point, Point)) -> f64 {
    let (a, b) = seg;
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return point_distance(p, a);
    }
    let t = ((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq;
    let t = t.clamp(0.0, 1.0);
    point_distance(p, Point::new(a.x + t * abx, a.y + t * aby))
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn segments_cross(p: (Point, Point), q: (Point, Point)) -> bool {
    let d1 = orientation(q.0, q.1, p.0);
    let d2 = orientation(q.0, q.1, p.1);
    let d3 = orientation(p.0, p.1, q.0);
    let d4 = orientation(p.0, p.1, q.1);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    // Collinear / endpoint-touching cases.
    (d1.abs() <= EPSILON && point_segment_distance(p.0, q) <= EPSILON)
        || (d2.abs() <= EPSILON && point_segment_distance(p.1, q) <= EPSILON)
        || (d3.abs() <= EPSILON && point_segment_distance(q.0, p) <= EPSILON)
        || (d4.abs() <= EPSILON && point_segment_distance(q.1, p) <= EPSILON)
}

/// Even-odd test across every ring, so points inside a hole count as
/// outside.
fn point_in_rings(p: Point, rings: &[Vec<Point>]) -> bool {
    let mut inside = false;
    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let a = ring[i];
            let b = ring[j];
            if (a.y > p.y) != (b.y > p.y)
                && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}

fn point_touches(p: Point, geom: &Geometry) -> bool {
    match geom {
        Geometry::Point(q) => point_distance(p, *q) <= EPSILON,
        Geometry::Polyline(_) => segments(geom)
            .into_iter()
            .any(|seg| point_segment_distance(p, seg) <= EPSILON),
        Geometry::Polygon(rings) => {
            point_in_rings(p, rings)
                || segments(geom)
                    .into_iter()
                    .any(|seg| point_segment_distance(p, seg) <= EPSILON)
        }
    }
}

fn first_vertex(geom: &Geometry) -> Option<Point> {
    geom.vertices().next()
}

/// Exact intersection test between two shapes.
pub(crate) fn intersects(a: &Geometry, b: &Geometry) -> bool {
    match (a, b) {
        (Geometry::Point(p), _) => point_touches(*p, b),
        (_, Geometry::Point(p)) => point_touches(*p, a),
        _ => {
            let segs_a = segments(a);
            let segs_b = segments(b);
            for sa in &segs_a {
                for sb in &segs_b {
                    if segments_cross(*sa, *sb) {
                        return true;
                    }
                }
            }
            // No edge crossings: one shape may still lie entirely inside the
            // other.
            if let Geometry::Polygon(rings) = a {
                if first_vertex(b).is_some_and(|p| point_in_rings(p, rings)) {
                    return true;
                }
            }
            if let Geometry::Polygon(rings) = b {
                if first_vertex(a).is_some_and(|p| point_in_rings(p, rings)) {
                    return true;
                }
            }
            false
        }
    }
}

/// Minimum planar distance between two shapes; zero when they intersect.
pub(crate) fn distance_between(a: &Geometry, b: &Geometry) -> f64 {
    if intersects(a, b) {
        return 0.0;
    }
    let segs_a = segments(a);
    let segs_b = segments(b);
    let mut best = f64::INFINITY;
    for p in a.vertices() {
        if segs_b.is_empty() {
            for q in b.vertices() {
                best = best.min(point_distance(p, q));
            }
        } else {
            for seg in &segs_b {
                best = best.min(point_segment_distance(p, *seg));
            }
        }
    }
    for q in b.vertices() {
        if segs_a.is_empty() {
            break;
        }
        for seg in &segs_a {
            best = best.min(point_segment_distance(q, *seg));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Geometry {
        Geometry::Polygon(vec![vec![
            Point::new(x0, y0),
            Point::new(x0 + size, y0),
            Point::new(x0 + size, y0 + size),
            Point::new(x0, y0 + size),
        ]])
    }

    #[test]
    fn point_inside_polygon_intersects() {
        let poly = square(0.0, 0.0, 10.0);
        assert!(intersects(&Geometry::Point(Point::new(5.0, 5.0)), &poly));
        assert!(!intersects(&Geometry::Point(Point::new(15.0, 5.0)), &poly));
    }

    #[test]
    fn point_inside_hole_does_not_intersect() {
        let donut = Geometry::Polygon(vec![
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ],
            vec![
                Point::new(4.0, 4.0),
                Point::new(6.0, 4.0),
                Point::new(6.0, 6.0),
                Point::new(4.0, 6.0),
            ],
        ]);
        assert!(!intersects(&Geometry::Point(Point::new(5.0, 5.0)), &donut));
        assert!(intersects(&Geometry::Point(Point::new(2.0, 2.0)), &donut));
    }

    #[test]
    fn crossing_polylines_intersect() {
        let a = Geometry::Polyline(vec![vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]]);
        let b = Geometry::Polyline(vec![vec![Point::new(0.0, 10.0), Point::new(10.0, 0.0)]]);
        let c = Geometry::Polyline(vec![vec![Point::new(0.0, 20.0), Point::new(10.0, 20.0)]]);
        assert!(intersects(&a, &b));
        assert!(!intersects(&a, &c));
    }

    #[test]
    fn contained_polygon_intersects_without_edge_crossings() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square(4.0, 4.0, 1.0);
        assert!(intersects(&outer, &inner));
        assert!(intersects(&inner, &outer));
    }

    #[test]
    fn distance_is_zero_on_contact_and_euclidean_otherwise() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(5.0, 0.0, 2.0);
        assert_eq!(distance_between(&a, &b), 3.0);
        assert_eq!(distance_between(&a, &square(1.0, 1.0, 2.0)), 0.0);

        let p = Geometry::Point(Point::new(0.0, 0.0));
        let q = Geometry::Point(Point::new(3.0, 4.0));
        assert_eq!(distance_between(&p, &q), 5.0);
    }
}
