use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::grid::{tile_cell, tile_rect};
use crate::geometry::primitives::Cell;
use crate::geometry::BBox;
use crate::projection::tile_count;

/// A tile of the slippy map quadtree
///
/// Ordering is by zoom, then column, then row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tile {
    #[serde(rename = "z")]
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl Tile {
    #[inline]
    pub fn new(zoom: u8, x: u32, y: u32) -> Tile {
        Tile { zoom, x, y }
    }

    /// Check if the column and row exist at the tile's zoom level
    pub fn is_valid(&self) -> bool {
        let count = tile_count(self.zoom);
        self.x < count && self.y < count
    }

    /// The tile's rectangle in planar coordinates
    #[inline]
    pub fn rect(&self) -> BBox {
        tile_rect(*self)
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        tile_cell(*self)
    }

    /// The four tiles covering this one on the next zoom level
    pub fn children(&self) -> [Tile; 4] {
        let zoom = self.zoom + 1;
        let (x, y) = (2 * self.x, 2 * self.y);
        [
            Tile::new(zoom, x, y),
            Tile::new(zoom, x + 1, y),
            Tile::new(zoom, x, y + 1),
            Tile::new(zoom, x + 1, y + 1),
        ]
    }

    pub fn parent(&self) -> Option<Tile> {
        (self.zoom > 0).then(|| Tile::new(self.zoom - 1, self.x / 2, self.y / 2))
    }
}

/// Formats as `zoom/x/y`
impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}
