use std::str::FromStr;

use nalgebra::Vector2;

use crate::error::Error;

/// An axis aligned bounding box
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BBox {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

/// The four lines a [`BBox`] is bounded by
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    MinX,
    MaxX,
    MinY,
    MaxY,
}

impl BBox {
    /// Create an "empty" bounding box which contains no point
    ///
    /// After creating use [`fit`] at least once to get an actual bounding box.
    ///
    /// [`fit`]: BBox::fit
    #[inline]
    pub fn new() -> BBox {
        BBox {
            min: Vector2::new(f64::INFINITY, f64::INFINITY),
            max: Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Check whether no point has been fitted into the box yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y)
    }

    /// Check if a point is contained inside the bounding box
    ///
    /// If the point lies exactly on the edge it is said to be contained.
    #[inline]
    pub fn contains(&self, point: Vector2<f64>) -> bool {
        self.min.x <= point.x
            && self.min.y <= point.y
            && point.x <= self.max.x
            && point.y <= self.max.y
    }

    /// Check if another box lies completely inside this one
    #[inline]
    pub fn contains_box(&self, other: &BBox) -> bool {
        !other.is_empty() && self.contains(other.min) && self.contains(other.max)
    }

    /// Adjust the bounding box's size to fit a given point
    #[inline]
    pub fn fit(&mut self, point: Vector2<f64>) {
        use std::cmp::Ordering::{Greater, Less};
        if matches!(self.min.x.partial_cmp(&point.x), Some(Greater)) {
            self.min.x = point.x;
        }
        if matches!(self.min.y.partial_cmp(&point.y), Some(Greater)) {
            self.min.y = point.y;
        }
        if matches!(self.max.x.partial_cmp(&point.x), Some(Less)) {
            self.max.x = point.x;
        }
        if matches!(self.max.y.partial_cmp(&point.y), Some(Less)) {
            self.max.y = point.y;
        }
    }

    /// Adjust the bounding box's size to fit another box
    #[inline]
    pub fn fit_box(&mut self, other: &BBox) {
        if !other.is_empty() {
            self.fit(other.min);
            self.fit(other.max);
        }
    }

    /// Check if two bounding boxes intersect
    ///
    /// Boxes sharing only an edge or a corner do intersect.
    pub fn intersects_box(&self, other: &BBox) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        (self.min + self.max) / 2.0
    }

    /// Clip a line segment to the bounding box
    ///
    /// Returns the part of `[from, to]` lying inside the box (edges included) or `None`.
    /// A clipped end which was cut by one of the box's sides has that side's coordinate exactly,
    /// so callers can compare it against the box's edges with `==`.
    pub fn clip_segment(
        &self,
        from: Vector2<f64>,
        to: Vector2<f64>,
    ) -> Option<(Vector2<f64>, Vector2<f64>)> {
        let delta = to - from;

        // Liang-Barsky: (side, direction towards the side, distance to the side)
        let sides = [
            (Side::MinX, -delta.x, from.x - self.min.x),
            (Side::MaxX, delta.x, self.max.x - from.x),
            (Side::MinY, -delta.y, from.y - self.min.y),
            (Side::MaxY, delta.y, self.max.y - from.y),
        ];

        let mut enter: (f64, Option<Side>) = (0.0, None);
        let mut leave: (f64, Option<Side>) = (1.0, None);
        for (side, direction, distance) in sides {
            if direction == 0.0 {
                // Parallel to this side
                if distance < 0.0 {
                    return None;
                }
            } else {
                let lambda = distance / direction;
                if direction < 0.0 {
                    if lambda > enter.0 {
                        enter = (lambda, Some(side));
                    }
                } else if lambda < leave.0 {
                    leave = (lambda, Some(side));
                }
            }
        }

        if !(enter.0 <= leave.0) {
            return None;
        }

        let start = match enter.1 {
            Some(side) => self.snap(from + delta * enter.0, side),
            None => from,
        };
        let end = match leave.1 {
            Some(side) => self.snap(from + delta * leave.0, side),
            None => to,
        };
        Some((start, end))
    }

    /// Move a point computed to lie on one of the box's sides exactly onto it
    fn snap(&self, point: Vector2<f64>, side: Side) -> Vector2<f64> {
        let mut point = Vector2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        );
        match side {
            Side::MinX => point.x = self.min.x,
            Side::MaxX => point.x = self.max.x,
            Side::MinY => point.y = self.min.y,
            Side::MaxY => point.y = self.max.y,
        }
        point
    }
}

impl Default for BBox {
    fn default() -> Self {
        BBox::new()
    }
}

impl FromIterator<Vector2<f64>> for BBox {
    fn from_iter<T: IntoIterator<Item = Vector2<f64>>>(iter: T) -> Self {
        let mut bbox = BBox::new();
        for v in iter {
            bbox.fit(v);
        }
        bbox
    }
}

/// Parse a geographic box from `min_lon,min_lat,max_lon,max_lat`
impl FromStr for BBox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::BoundingBox(s.to_string());

        let values = s
            .split(',')
            .map(|value| value.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        match values.as_slice() {
            &[min_lon, min_lat, max_lon, max_lat]
                if values.iter().all(|value| value.is_finite())
                    && min_lon <= max_lon
                    && min_lat <= max_lat =>
            {
                Ok(BBox {
                    min: Vector2::new(min_lon, min_lat),
                    max: Vector2::new(max_lon, max_lat),
                })
            }
            _ => Err(invalid()),
        }
    }
}
