//! Find every tile intersecting a set of geometries by descending the tile quadtree

use std::collections::BTreeSet;
use std::time::Instant;

use log::{debug, info};

use crate::error::{Error, FeatureError};
use crate::geometry::grid::ZoomRange;
use crate::geometry::polyline::{iter_ring_segments, iter_segments};
use crate::geometry::primitives::{Boundary, Cell, Overlap};
use crate::geometry::{buffer, BBox, BufferedGeometry, Geometry, Point, Polygon};
use crate::measurements::Measurements;
use crate::projection::Projection;
use crate::tile::Tile;
use crate::Config;

/// A buffered part prepared for being tested against many tiles
struct Part {
    bbox: BBox,
    shape: Shape,
}

enum Shape {
    /// Polygon enclosing some area
    Area(Polygon),

    /// Anything without area, reduced to its segments
    Path(Vec<(Point, Point)>),
}

impl Part {
    fn new(geometry: Geometry) -> Option<Part> {
        let bbox = geometry.bbox();
        if bbox.is_empty() {
            return None;
        }
        let shape = match geometry {
            Geometry::Polygon(polygon) if polygon.is_degenerate() => {
                Shape::Path(iter_ring_segments(polygon.outer()).collect())
            }
            Geometry::Polygon(polygon) => Shape::Area(polygon),
            Geometry::Line(line) => Shape::Path(iter_segments(&line).collect()),
        };
        Some(Part { bbox, shape })
    }

    fn overlap(&self, cell: &Cell, boundary: Boundary) -> Overlap {
        if !self.bbox.intersects_box(&cell.rect) {
            return Overlap::Disjoint;
        }
        let overlap = match &self.shape {
            Shape::Area(polygon) => polygon.overlap(cell, boundary),
            Shape::Path(segments) => {
                if segments
                    .iter()
                    .any(|&(from, to)| cell.meets_path_segment(from, to, boundary))
                {
                    Overlap::Partial
                } else {
                    Overlap::Disjoint
                }
            }
        };
        if overlap == Overlap::Partial && cell.rect.contains_box(&self.bbox) {
            Overlap::Within
        } else {
            overlap
        }
    }
}

/// Compare a tile with the union of all parts
fn classify(parts: &[Part], cell: &Cell, boundary: Boundary) -> Overlap {
    let mut result = Overlap::Disjoint;
    for part in parts {
        match part.overlap(cell, boundary) {
            Overlap::Contains => return Overlap::Contains,
            Overlap::Disjoint => {}
            Overlap::Within if result == Overlap::Disjoint => result = Overlap::Within,
            Overlap::Within => {}
            Overlap::Partial => result = Overlap::Partial,
        }
    }
    result
}

fn prepare(buffered: BufferedGeometry) -> Vec<Part> {
    buffered.parts.into_iter().filter_map(Part::new).collect()
}

pub struct IntersectingTilesFinder<P: Projection> {
    config: Config,
    projection: P,

    /// Every tile found so far
    tiles: BTreeSet<Tile>,

    /// Tiles still to be tested and whether their parent was completely covered
    ///
    /// Kept between geometries to reuse its allocation.
    stack: Vec<(Tile, bool)>,

    measurements: Measurements,
}

impl<P: Projection> IntersectingTilesFinder<P> {
    pub fn new(config: Config, projection: P) -> Result<Self, Error> {
        config.validate()?;
        Ok(IntersectingTilesFinder {
            config,
            projection,
            tiles: BTreeSet::new(),
            stack: Vec::new(),
            measurements: Measurements::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn projection(&self) -> P {
        self.projection
    }

    /// Add every geometry of a source
    ///
    /// Features which failed to convert are skipped and counted.
    pub fn find_intersections<I>(&mut self, geometries: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = Result<Geometry, FeatureError>>,
    {
        for geometry in geometries {
            match geometry {
                Ok(geometry) => self.add_geometry(&geometry)?,
                Err(error) => self.skip(error),
            }
        }
        Ok(())
    }

    /// Record a feature which couldn't be converted into a geometry
    pub fn skip(&mut self, error: FeatureError) {
        info!("Skipping feature: {error}");
        self.measurements.skipped += 1;
    }

    /// Add the tiles intersecting a geographic geometry
    pub fn add_geometry(&mut self, geometry: &Geometry) -> Result<(), Error> {
        let now = Instant::now();
        let tested = self.add_planar(geometry.project(&self.projection))?;
        let elapsed = now.elapsed();

        let (time, tests) = match geometry {
            Geometry::Polygon(_) => (
                &mut self.measurements.time.polygons,
                &mut self.measurements.tested.polygons,
            ),
            Geometry::Line(_) => (
                &mut self.measurements.time.lines,
                &mut self.measurements.tested.lines,
            ),
        };
        time.add(elapsed);
        tests.add(tested);
        Ok(())
    }

    /// Add the tiles intersecting an already projected geometry
    ///
    /// Returns the number of tiles which had to be tested.
    pub fn add_planar(&mut self, geometry: Geometry) -> Result<u64, Error> {
        let kind = geometry.kind();
        let points = geometry.points();

        let buffered = buffer(geometry, self.config.buffer);
        let bbox = buffered.bbox();
        let parts = prepare(buffered);
        if parts.is_empty() {
            debug!("Ignoring empty {kind}");
            return Ok(0);
        }

        let found = self.tiles.len();
        let tested = self.descend(&parts, &bbox)?;
        debug!(
            "Tested {tested} tiles for {kind} with {points} points, found {} new tiles",
            self.tiles.len() - found
        );
        Ok(tested)
    }

    fn descend(&mut self, parts: &[Part], bbox: &BBox) -> Result<u64, Error> {
        let Config {
            min_zoom,
            max_zoom,
            boundary,
            ..
        } = self.config;

        let candidates = ZoomRange::for_rect(bbox, min_zoom).grown(1);
        self.stack.clear();
        self.stack
            .try_reserve(usize::try_from(candidates.len()).unwrap_or(usize::MAX))
            .map_err(|source| Error::Allocation {
                candidates: candidates.len(),
                source,
            })?;
        self.stack.extend(candidates.tiles().map(|tile| (tile, false)));

        let mut tested: u64 = 0;
        while let Some((tile, covered)) = self.stack.pop() {
            let overlap = if covered {
                Overlap::Contains
            } else {
                tested += 1;
                classify(parts, &tile.cell(), boundary)
            };
            if !overlap.intersects() {
                continue;
            }

            self.tiles.insert(tile);
            if tile.zoom < max_zoom {
                let covered = overlap == Overlap::Contains;
                self.stack
                    .extend(tile.children().into_iter().map(|child| (child, covered)));
            }
        }
        Ok(tested)
    }

    /// Iterate over the found tiles ordered by zoom, x and y
    pub fn tiles(&self) -> impl ExactSizeIterator<Item = Tile> + '_ {
        self.tiles.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn into_tiles(self) -> BTreeSet<Tile> {
        self.tiles
    }

    /// Take over the tiles and measurements of another finder
    pub fn merge(&mut self, mut other: IntersectingTilesFinder<P>) {
        self.tiles.append(&mut other.tiles);
        self.measurements.merge(&other.measurements);
    }

    /// Drop every found tile and free the memory used for the search
    pub fn release(&mut self) {
        self.tiles = BTreeSet::new();
        self.stack = Vec::new();
    }

    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }
}
