//! Various function working with polylines

use crate::geometry::Point;

/// Create an iterator over a polyline's segments
///
/// A polyline made of a single point yields that point as a zero length segment.
pub fn iter_segments(polyline: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let single = match polyline {
        &[point] => Some((point, point)),
        _ => None,
    };
    single
        .into_iter()
        .chain(polyline.windows(2).map(|pair| (pair[0], pair[1])))
}

/// Create an iterator over a ring's segments including the one closing it
pub fn iter_ring_segments(ring: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let len = ring.len();
    (0..len).map(move |i| (ring[i], ring[(i + 1) % len]))
}

/// Compute a point's distance to a single segment
pub fn segment_distance(from: Point, to: Point, point: Point) -> f64 {
    let delta = to - from;
    let length_squared = delta.norm_squared();
    if length_squared == 0.0 {
        return point.metric_distance(&from);
    }

    // Calculate projection onto the line
    let lambda = (point - from).dot(&delta) / length_squared;

    if (0.0..=1.0).contains(&lambda) {
        (from + lambda * delta).metric_distance(&point)
    } else {
        point.metric_distance(&from).min(point.metric_distance(&to))
    }
}

/// Compute a point's distance to a polyline
pub fn distance_to(polyline: &[Point], point: Point) -> f64 {
    iter_segments(polyline)
        .map(|(from, to)| segment_distance(from, to, point))
        .fold(f64::INFINITY, f64::min)
}
