use serde::{Deserialize, Serialize};

use crate::error::{Error, FeatureError};
use crate::finder::IntersectingTilesFinder;
use crate::geometry::grid::ZoomRange;
use crate::geometry::primitives::Boundary;
use crate::geometry::{BBox, Geometry};
use crate::projection::{Projection, MAX_ZOOM};
use crate::tile::Tile;

pub mod error;
pub mod finder;
pub mod formats;
pub mod geometry;
pub mod measurements;
pub mod projection;
pub mod source;
pub mod threading;
pub mod tile;

/// Parameters shared by every tile search
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lowest zoom level to produce tiles for
    pub min_zoom: u8,

    /// Highest zoom level to produce tiles for
    pub max_zoom: u8,

    /// Distance in meters on the ground by which geometries are grown
    pub buffer: f64,

    /// Whether touching a tile counts as intersecting it
    pub boundary: Boundary,

    /// Log measurements after the search
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_zoom: 0,
            max_zoom: 14,
            buffer: 0.0,
            boundary: Boundary::default(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if self.min_zoom > self.max_zoom {
            return Err(Error::ZoomOrder {
                min_zoom: self.min_zoom,
                max_zoom: self.max_zoom,
            });
        }
        if self.max_zoom > MAX_ZOOM {
            return Err(Error::ZoomTooLarge(self.max_zoom));
        }
        if !(self.buffer.is_finite() && self.buffer >= 0.0) {
            return Err(Error::BufferSize(self.buffer));
        }
        Ok(())
    }
}

/// Every tile covering a geographic bounding box on every zoom level in `min_zoom..=max_zoom`
///
/// No intersection tests are done, the tiles are just the ones spanned by the box's corners.
/// Fails for the same zoom ranges [`Config::validate`] rejects.
pub fn bbox_tiles(
    bbox: BBox,
    min_zoom: u8,
    max_zoom: u8,
) -> Result<impl Iterator<Item = Tile>, Error> {
    Config {
        min_zoom,
        max_zoom,
        ..Config::default()
    }
    .validate()?;
    Ok((min_zoom..=max_zoom)
        .flat_map(move |zoom| ZoomRange::from_bbox_geographic(&bbox, zoom).tiles()))
}

/// Find the tiles intersecting some geographic geometries in one go
pub fn find_tiles<P, I>(
    config: Config,
    projection: P,
    geometries: I,
) -> Result<IntersectingTilesFinder<P>, Error>
where
    P: Projection,
    I: IntoIterator<Item = Result<Geometry, FeatureError>>,
{
    let mut finder = IntersectingTilesFinder::new(config, projection)?;
    finder.find_intersections(geometries)?;
    if config.verbose {
        finder.measurements().print();
    }
    Ok(finder)
}
