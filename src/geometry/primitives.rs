//! Exact intersection predicates between geometry and a single tile

use serde::{Deserialize, Serialize};

use super::{BBox, Point};

/// Which points on a tile's edges belong to the tile
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binary", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Boundary {
    /// Areas have to overlap a tile's interior,
    /// lines and points belong to the one tile whose half open cell contains them.
    ///
    /// Touching a tile along an edge or at a corner never selects it.
    #[default]
    HalfOpen,

    /// Every geometry touching a tile's closed rectangle selects it.
    Closed,
}

/// Result of comparing a geometry with a tile
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Overlap {
    /// No intersection, the tile and all its children can be skipped
    Disjoint,
    /// The geometry covers the whole tile (and therefore all of its children)
    Contains,
    /// The geometry lies completely inside the tile
    Within,
    /// Anything else intersecting
    Partial,
}

impl Overlap {
    #[inline]
    pub fn intersects(self) -> bool {
        !matches!(self, Overlap::Disjoint)
    }
}

/// A tile's rectangle in planar coordinates
///
/// Its half open cell is `[min.x, max.x) × (min.y, max.y]` i.e. it owns its western and northern edges.
/// Tiles on the eastern or southern border of the world own that border as well.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cell {
    pub rect: BBox,
    pub closed_east: bool,
    pub closed_south: bool,
}

impl Cell {
    /// Check if a point lies in the half open cell
    pub fn contains(&self, point: Point) -> bool {
        let BBox { min, max } = self.rect;
        min.x <= point.x
            && point.y <= max.y
            && (point.x < max.x || (self.closed_east && point.x == max.x))
            && (point.y > min.y || (self.closed_south && point.y == min.y))
    }

    /// Check if a segment has a point in the half open cell
    pub fn meets_segment(&self, from: Point, to: Point) -> bool {
        match self.rect.clip_segment(from, to) {
            None => false,
            Some((start, end)) => {
                let on_east = start.x == self.rect.max.x && end.x == self.rect.max.x;
                let on_south = start.y == self.rect.min.y && end.y == self.rect.min.y;
                !((on_east && !self.closed_east) || (on_south && !self.closed_south))
            }
        }
    }

    /// Check if a segment passes through the open interior of the rectangle
    pub fn meets_interior(&self, from: Point, to: Point) -> bool {
        match self.rect.clip_segment(from, to) {
            None => false,
            Some((start, end)) => {
                let BBox { min, max } = self.rect;
                let on_vertical = start.x == end.x && (start.x == min.x || start.x == max.x);
                let on_horizontal = start.y == end.y && (start.y == min.y || start.y == max.y);
                !(on_vertical || on_horizontal)
            }
        }
    }

    /// Check if a segment touches the closed rectangle
    #[inline]
    pub fn meets_rect(&self, from: Point, to: Point) -> bool {
        self.rect.clip_segment(from, to).is_some()
    }

    /// Check a segment according to the boundary rule for lines and points
    #[inline]
    pub fn meets_path_segment(&self, from: Point, to: Point, boundary: Boundary) -> bool {
        match boundary {
            Boundary::HalfOpen => self.meets_segment(from, to),
            Boundary::Closed => self.meets_rect(from, to),
        }
    }

    /// Check an area's edge according to the boundary rule for areas
    #[inline]
    pub fn meets_area_edge(&self, from: Point, to: Point, boundary: Boundary) -> bool {
        match boundary {
            Boundary::HalfOpen => self.meets_interior(from, to),
            Boundary::Closed => self.meets_rect(from, to),
        }
    }
}
