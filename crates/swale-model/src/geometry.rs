use serde::{Deserialize, Serialize};

/// A 2D coordinate in the dataset's projected reference system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Geometry kind a feature class is declared to hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Point,
    Polyline,
    Polygon,
}

/// Shape carried by a single feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "snake_case")]
pub enum Geometry {
    Point(Point),
    /// One or more paths, each a sequence of vertices.
    Polyline(Vec<Vec<Point>>),
    /// Rings of vertices; the first ring is the exterior, the rest are holes.
    Polygon(Vec<Vec<Point>>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Polyline(_) => GeometryKind::Polyline,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Axis-aligned bounding envelope.
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        for p in self.vertices() {
            env.expand(p);
        }
        env
    }

    /// Every vertex of the shape, in declaration order.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        let parts: &[Vec<Point>] = match self {
            Geometry::Point(p) => return VertexIter::Single(std::iter::once(*p)),
            Geometry::Polyline(parts) | Geometry::Polygon(parts) => parts,
        };
        VertexIter::Parts(parts.iter().flatten().copied())
    }

    /// Planar area in squared coordinate units. Holes are subtracted;
    /// non-polygons have zero area.
    pub fn area(&self) -> f64 {
        let Geometry::Polygon(rings) = self else {
            return 0.0;
        };
        let mut area = 0.0;
        for (i, ring) in rings.iter().enumerate() {
            let ring_area = signed_ring_area(ring).abs();
            if i == 0 {
                area += ring_area;
            } else {
                area -= ring_area;
            }
        }
        area.max(0.0)
    }

    /// Total path length in coordinate units; zero for points and polygons.
    pub fn length(&self) -> f64 {
        let Geometry::Polyline(paths) = self else {
            return 0.0;
        };
        paths
            .iter()
            .flat_map(|path| path.windows(2))
            .map(|seg| {
                let dx = seg[1].x - seg[0].x;
                let dy = seg[1].y - seg[0].y;
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }
}

enum VertexIter<'a> {
    Single(std::iter::Once<Point>),
    Parts(std::iter::Copied<std::iter::Flatten<std::slice::Iter<'a, Vec<Point>>>>),
}

impl Iterator for VertexIter<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        match self {
            VertexIter::Single(it) => it.next(),
            VertexIter::Parts(it) => it.next(),
        }
    }
}

fn signed_ring_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn expand(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Grow the envelope outward by `margin` on every side.
    pub fn buffered(self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}
