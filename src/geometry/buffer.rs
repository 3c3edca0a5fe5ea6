//! Buffer operations
//!
//! A buffered geometry is the union of the original area (for polygons) and one convex polygon per
//! segment, covering every point within the buffer distance of that segment.
//! Joins and caps are round, approximated by a regular polygon *circumscribing* the buffer circle
//! so the result never misses a point within the distance.

use std::f64::consts::PI;

use geo::algorithm::convex_hull::ConvexHull;
use geo::{Coord, MultiPoint};

use super::polyline::{iter_ring_segments, iter_segments};
use super::{BBox, Geometry, Point, Polygon};
use crate::projection::{mercator_scale, y_to_lat};

/// Number of vertices used to approximate a circle
pub const CIRCLE_SEGMENTS: usize = 16;

/// The union of its parts is the buffered area
#[derive(Clone, Debug, PartialEq)]
pub struct BufferedGeometry {
    pub parts: Vec<Geometry>,
}

impl BufferedGeometry {
    pub fn bbox(&self) -> BBox {
        let mut bbox = BBox::new();
        for part in &self.parts {
            bbox.fit_box(&part.bbox());
        }
        bbox
    }
}

/// Buffer a planar geometry by a distance given in meters on the ground
///
/// The distance is converted into planar units separately for every segment,
/// using the scale at the segment's latitude farthest from the equator.
/// A distance of zero returns the geometry unchanged.
pub fn buffer(geometry: Geometry, meters: f64) -> BufferedGeometry {
    if !(meters > 0.0) {
        return BufferedGeometry {
            parts: vec![geometry],
        };
    }

    let mut parts = Vec::new();
    match geometry {
        Geometry::Polygon(polygon) => {
            for ring in &polygon.rings {
                parts.extend(
                    iter_ring_segments(ring)
                        .map(|(from, to)| Geometry::Polygon(capsule(from, to, meters))),
                );
            }
            if !polygon.is_degenerate() {
                parts.push(Geometry::Polygon(polygon));
            }
        }
        Geometry::Line(line) => {
            parts.extend(
                iter_segments(&line).map(|(from, to)| Geometry::Polygon(capsule(from, to, meters))),
            );
        }
    }
    BufferedGeometry { parts }
}

/// Convert a ground distance into planar units for a segment
fn planar_distance(from: Point, to: Point, meters: f64) -> f64 {
    let lat = y_to_lat(from.y).abs().max(y_to_lat(to.y).abs());
    meters * mercator_scale(lat)
}

/// Convex polygon containing every point within `meters` of the segment
fn capsule(from: Point, to: Point, meters: f64) -> Polygon {
    let radius = planar_distance(from, to, meters) / (PI / CIRCLE_SEGMENTS as f64).cos();

    let mut points = Vec::with_capacity(2 * CIRCLE_SEGMENTS);
    for i in 0..CIRCLE_SEGMENTS {
        let angle = 2.0 * PI * i as f64 / CIRCLE_SEGMENTS as f64;
        let offset = Point::new(radius * angle.cos(), radius * angle.sin());
        points.push(from + offset);
        if to != from {
            points.push(to + offset);
        }
    }

    let points: MultiPoint<f64> = points
        .into_iter()
        .map(|point| Coord {
            x: point.x,
            y: point.y,
        })
        .collect();
    let hull = points.convex_hull();

    let mut ring: Vec<Point> = hull
        .exterior()
        .coords()
        .map(|coord| Point::new(coord.x, coord.y))
        .collect();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    Polygon::new(ring, Vec::new())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::polygon::signed_area;
    use crate::geometry::polyline::distance_to;

    fn line() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1000.0, 0.0),
            Point::new(1000.0, 1000.0),
        ]
    }

    fn contained(buffered: &BufferedGeometry, point: Point) -> bool {
        buffered.parts.iter().any(|part| match part {
            Geometry::Polygon(polygon) => polygon.contains(point),
            Geometry::Line(_) => false,
        })
    }

    #[test]
    fn zero_distance_keeps_geometry() {
        let geometry = Geometry::Line(line());
        assert_eq!(
            buffer(geometry.clone(), 0.0),
            BufferedGeometry {
                parts: vec![geometry]
            }
        );
    }

    #[test]
    fn capsule_is_an_open_counter_clockwise_hull() {
        let capsule = capsule(Point::new(0.0, 0.0), Point::new(1000.0, 0.0), 100.0);
        let ring = capsule.outer();

        // Half a circle around each end
        assert!(ring.len() >= CIRCLE_SEGMENTS);
        assert_ne!(ring.first(), ring.last());
        assert!(signed_area(ring) > 0.0);

        assert!(capsule.contains(Point::new(500.0, 99.0)));
        assert!(capsule.contains(Point::new(-99.0, 0.0)));
        assert!(!capsule.contains(Point::new(500.0, 120.0)));
    }

    #[test]
    fn capsule_covers_every_point_within_distance() {
        let buffered = buffer(Geometry::Line(line()), 100.0);
        assert_eq!(buffered.parts.len(), 2);

        // Sample points around the line
        for i in -20..=120 {
            for j in -20..=120 {
                let point = Point::new(i as f64 * 10.0, j as f64 * 10.0);
                let distance = distance_to(&line(), point);
                if distance <= 100.0 {
                    assert!(contained(&buffered, point), "{point:?} should be buffered");
                }
                if distance > 110.0 {
                    assert!(!contained(&buffered, point), "{point:?} is too far away");
                }
            }
        }
    }

    #[test]
    fn polygon_keeps_its_fill() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(1000.0, 0.0),
            Point::new(1000.0, 1000.0),
            Point::new(0.0, 1000.0),
        ];
        let buffered = buffer(Geometry::Polygon(Polygon::new(square, Vec::new())), 10.0);

        // Four edges and the original area
        assert_eq!(buffered.parts.len(), 5);
        assert!(contained(&buffered, Point::new(500.0, 500.0)));
        assert!(contained(&buffered, Point::new(-9.0, 500.0)));
        assert!(!contained(&buffered, Point::new(-20.0, 500.0)));

        let bbox = buffered.bbox();
        assert!(bbox.min.x <= -10.0 && bbox.max.y >= 1010.0);
    }

    #[test]
    fn degenerate_polygon_becomes_a_circle() {
        let point = Polygon::new(vec![Point::new(0.0, 0.0)], Vec::new());
        let buffered = buffer(Geometry::Polygon(point), 50.0);
        assert_eq!(buffered.parts.len(), 1);
        match &buffered.parts[0] {
            Geometry::Polygon(circle) => assert_eq!(circle.outer().len(), CIRCLE_SEGMENTS),
            Geometry::Line(_) => unreachable!("buffering produces polygons"),
        }
        assert!(contained(&buffered, Point::new(35.0, 35.0)));
        assert!(!contained(&buffered, Point::new(40.0, 40.0)));
    }

    #[test]
    fn distance_grows_with_latitude() {
        let near_equator = capsule(Point::new(0.0, 0.0), Point::new(0.0, 0.0), 100.0);
        let y = crate::projection::lat_to_y_exact(60.0);
        let up_north = capsule(Point::new(0.0, y), Point::new(0.0, y), 100.0);

        let width = |polygon: &Polygon| polygon.bbox().max.x - polygon.bbox().min.x;
        assert!((width(&up_north) / width(&near_equator) - 2.0).abs() < 1e-6);
    }
}
