//! Conversion between planar rectangles and ranges of tiles

use super::bbox::BBox;
use super::primitives::Cell;
use super::Point;
use crate::projection::{
    lat_to_y, lon_to_x, merc_x_to_tile_x, merc_y_to_tile_y, tile_count, tile_x_to_merc_x,
    tile_y_to_merc_y,
};
use crate::tile::Tile;

/// Inclusive range of tile columns and rows on a single zoom level
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ZoomRange {
    pub zoom: u8,
    pub xmin: u32,
    pub xmax: u32,
    pub ymin: u32,
    pub ymax: u32,
}

impl ZoomRange {
    /// A range containing no tile
    pub fn empty(zoom: u8) -> ZoomRange {
        ZoomRange {
            zoom,
            xmin: 1,
            xmax: 0,
            ymin: 1,
            ymax: 0,
        }
    }

    /// Every tile of a zoom level
    pub fn world(zoom: u8) -> ZoomRange {
        let last = tile_count(zoom) - 1;
        ZoomRange {
            zoom,
            xmin: 0,
            xmax: last,
            ymin: 0,
            ymax: last,
        }
    }

    /// The tiles covering a planar rectangle
    ///
    /// A corner lying exactly on a tile edge belongs to the tile east or south of it.
    /// Degenerate rectangles result in a single tile.
    pub fn for_rect(rect: &BBox, zoom: u8) -> ZoomRange {
        if rect.is_empty() {
            return ZoomRange::empty(zoom);
        }
        ZoomRange {
            zoom,
            xmin: merc_x_to_tile_x(rect.min.x, zoom).floor() as u32,
            xmax: merc_x_to_tile_x(rect.max.x, zoom).floor() as u32,
            // Rows count from the north
            ymin: merc_y_to_tile_y(rect.max.y, zoom).floor() as u32,
            ymax: merc_y_to_tile_y(rect.min.y, zoom).floor() as u32,
        }
    }

    /// The tiles covering a geographic rectangle
    pub fn from_bbox_geographic(bbox: &BBox, zoom: u8) -> ZoomRange {
        if bbox.is_empty() {
            return ZoomRange::empty(zoom);
        }
        let rect = BBox {
            min: Point::new(lon_to_x(bbox.min.x), lat_to_y(bbox.min.y)),
            max: Point::new(lon_to_x(bbox.max.x), lat_to_y(bbox.max.y)),
        };
        ZoomRange::for_rect(&rect, zoom)
    }

    /// Widen the range by some tiles into every direction without leaving the world
    pub fn grown(&self, tiles: u32) -> ZoomRange {
        if self.is_empty() {
            return *self;
        }
        let last = tile_count(self.zoom) - 1;
        ZoomRange {
            zoom: self.zoom,
            xmin: self.xmin.saturating_sub(tiles),
            xmax: self.xmax.saturating_add(tiles).min(last),
            ymin: self.ymin.saturating_sub(tiles),
            ymax: self.ymax.saturating_add(tiles).min(last),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    /// Number of tiles in the range
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.xmax - self.xmin + 1) as u64 * (self.ymax - self.ymin + 1) as u64
        }
    }

    pub fn contains(&self, tile: Tile) -> bool {
        tile.zoom == self.zoom
            && (self.xmin..=self.xmax).contains(&tile.x)
            && (self.ymin..=self.ymax).contains(&tile.y)
    }

    /// Iterate over the range's tiles, column by column
    pub fn tiles(&self) -> impl Iterator<Item = Tile> {
        let ZoomRange {
            zoom,
            xmin,
            xmax,
            ymin,
            ymax,
        } = *self;
        (xmin..=xmax).flat_map(move |x| (ymin..=ymax).map(move |y| Tile::new(zoom, x, y)))
    }
}

/// Planar rectangle of a tile
///
/// Neighbouring tiles and a tile's children share the exact same edge coordinates.
pub fn tile_rect(tile: Tile) -> BBox {
    let Tile { zoom, x, y } = tile;
    BBox {
        min: Point::new(
            tile_x_to_merc_x(x as f64, zoom),
            tile_y_to_merc_y(y as f64 + 1.0, zoom),
        ),
        max: Point::new(
            tile_x_to_merc_x(x as f64 + 1.0, zoom),
            tile_y_to_merc_y(y as f64, zoom),
        ),
    }
}

/// Planar rectangle of a tile together with the edges it owns
pub fn tile_cell(tile: Tile) -> Cell {
    let last = tile_count(tile.zoom) - 1;
    Cell {
        rect: tile_rect(tile),
        closed_east: tile.x == last,
        closed_south: tile.y == last,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::projection::{EARTH_CIRCUMFERENCE, MERCATOR_MAX};

    #[test]
    fn whole_world() {
        let world = BBox {
            min: Point::new(-MERCATOR_MAX, -MERCATOR_MAX),
            max: Point::new(MERCATOR_MAX, MERCATOR_MAX),
        };
        assert_eq!(ZoomRange::for_rect(&world, 0), ZoomRange::world(0));
        assert_eq!(ZoomRange::for_rect(&world, 5), ZoomRange::world(5));
        assert_eq!(ZoomRange::world(5).len(), 1024);
    }

    #[test]
    fn degenerate_rect() {
        let point = BBox {
            min: Point::new(0.0, 0.0),
            max: Point::new(0.0, 0.0),
        };
        for zoom in 0..10 {
            let range = ZoomRange::for_rect(&point, zoom);
            assert_eq!(range.len(), 1);
            let half = tile_count(zoom) / 2;
            assert_eq!(range.tiles().next(), Some(Tile::new(zoom, half, half)));
        }

        assert!(ZoomRange::for_rect(&BBox::new(), 0).is_empty());
        assert_eq!(ZoomRange::for_rect(&BBox::new(), 3).tiles().count(), 0);
    }

    #[test]
    fn geographic_box_around_null_island() {
        let bbox: BBox = "-10,-10,10,10".parse().unwrap();
        let range = ZoomRange::from_bbox_geographic(&bbox, 1);
        assert_eq!(range, ZoomRange::world(1));
        assert_eq!(
            range.tiles().collect::<Vec<_>>(),
            vec![
                Tile::new(1, 0, 0),
                Tile::new(1, 0, 1),
                Tile::new(1, 1, 0),
                Tile::new(1, 1, 1),
            ]
        );

        let range = ZoomRange::from_bbox_geographic(&bbox, 4);
        assert_eq!((range.xmin, range.xmax, range.ymin, range.ymax), (7, 8, 7, 8));
    }

    #[test]
    fn growing_stays_in_the_world() {
        let range = ZoomRange {
            zoom: 2,
            xmin: 0,
            xmax: 1,
            ymin: 3,
            ymax: 3,
        };
        assert_eq!(
            range.grown(1),
            ZoomRange {
                zoom: 2,
                xmin: 0,
                xmax: 2,
                ymin: 2,
                ymax: 3,
            }
        );
        assert!(ZoomRange::empty(2).grown(1).is_empty());
    }

    #[test]
    fn rects_of_tiles() {
        let rect = tile_rect(Tile::new(0, 0, 0));
        assert_eq!(rect.min, Point::new(-MERCATOR_MAX, -MERCATOR_MAX));
        assert_eq!(rect.max, Point::new(MERCATOR_MAX, MERCATOR_MAX));

        let rect = tile_rect(Tile::new(1, 1, 0));
        assert_eq!(rect.min, Point::new(0.0, 0.0));
        assert_eq!(rect.max, Point::new(MERCATOR_MAX, MERCATOR_MAX));

        let rect = tile_rect(Tile::new(3, 2, 6));
        assert_eq!(rect.max.x - rect.min.x, EARTH_CIRCUMFERENCE / 8.0);
    }

    #[test]
    fn children_share_edges_with_parent() {
        let parent = Tile::new(7, 66, 41);
        let rect = parent.rect();
        let [north_west, north_east, south_west, south_east] = parent.children();
        assert_eq!(north_west.rect().min.x, rect.min.x);
        assert_eq!(north_west.rect().max.y, rect.max.y);
        assert_eq!(north_east.rect().max.x, rect.max.x);
        assert_eq!(south_west.rect().min.y, rect.min.y);
        assert_eq!(south_east.rect().max.x, rect.max.x);
        assert_eq!(south_east.rect().min.y, rect.min.y);
        assert_eq!(north_west.rect().max.x, south_east.rect().min.x);
        assert_eq!(north_west.rect().min.y, south_east.rect().max.y);
    }

    #[test]
    fn rect_and_range_agree() {
        for tile in ZoomRange::world(3).tiles() {
            let rect = tile.rect();
            let range = ZoomRange::for_rect(&BBox {
                min: rect.center(),
                max: rect.center(),
            }, 3);
            assert!(range.contains(tile));
            assert_eq!(range.len(), 1);
        }
    }

    #[test]
    fn border_cells_are_closed() {
        assert!(tile_cell(Tile::new(0, 0, 0)).closed_east);
        assert!(tile_cell(Tile::new(0, 0, 0)).closed_south);
        let cell = tile_cell(Tile::new(2, 3, 1));
        assert!(cell.closed_east && !cell.closed_south);
    }
}
