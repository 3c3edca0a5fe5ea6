use crate::geometry::polyline::iter_ring_segments;
use crate::geometry::primitives::{Boundary, Cell, Overlap};
use crate::geometry::{BBox, Point};

/// A polygon made of an outer ring followed by its inner rings (holes)
///
/// Rings are implicitly closed, repeating the first point at the end is optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Vec<Point>>,
}

impl Polygon {
    pub fn new(outer: Vec<Point>, inner: Vec<Vec<Point>>) -> Polygon {
        let mut rings = Vec::with_capacity(inner.len() + 1);
        rings.push(outer);
        rings.extend(inner);
        Polygon { rings }
    }

    pub fn outer(&self) -> &[Point] {
        self.rings.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn bbox(&self) -> BBox {
        self.outer().iter().copied().collect()
    }

    /// Iterate over the edges of all rings
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.rings.iter().flat_map(|ring| iter_ring_segments(ring))
    }

    /// A polygon is degenerate if all points of its outer ring lie on a single line
    ///
    /// This includes rings with fewer than 3 distinct points.
    /// Self intersecting rings whose signed area cancels out still enclose some area.
    /// Degenerate polygons still have a position and are treated like closed lines.
    pub fn is_degenerate(&self) -> bool {
        let ring = self.outer();
        let origin = match ring.first() {
            Some(&origin) => origin,
            None => return true,
        };
        let mut direction: Option<Point> = None;
        for &point in ring {
            let offset = point - origin;
            if offset.x == 0.0 && offset.y == 0.0 {
                continue;
            }
            match direction {
                None => direction = Some(offset),
                Some(direction) => {
                    if direction.x * offset.y - direction.y * offset.x != 0.0 {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Check if a point lies inside the polygon using the even-odd rule over all rings
    ///
    /// Points exactly on an edge may be classified either way.
    pub fn contains(&self, point: Point) -> bool {
        let mut inside = false;
        for (from, to) in self.edges() {
            if (from.y > point.y) != (to.y > point.y) {
                let x = from.x + (point.y - from.y) / (to.y - from.y) * (to.x - from.x);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Compare the polygon's area with a tile
    ///
    /// If no edge enters the tile, the tile lies either completely inside or completely outside,
    /// which is decided by its center.
    pub fn overlap(&self, cell: &Cell, boundary: Boundary) -> Overlap {
        if self
            .edges()
            .any(|(from, to)| cell.meets_area_edge(from, to, boundary))
        {
            Overlap::Partial
        } else if self.contains(cell.rect.center()) {
            Overlap::Contains
        } else {
            Overlap::Disjoint
        }
    }
}

/// Signed area of a ring, positive for counter clockwise rings
///
/// Coordinates are taken relative to the first point,
/// which makes rings lying on a single axis parallel line exactly zero.
pub fn signed_area(ring: &[Point]) -> f64 {
    let origin = match ring.first() {
        Some(&origin) => origin,
        None => return 0.0,
    };
    let twice: f64 = iter_ring_segments(ring)
        .map(|(from, to)| {
            let (from, to) = (from - origin, to - origin);
            from.x * to.y - to.x * from.y
        })
        .sum();
    twice / 2.0
}
