//! Read geometries from GeoJSON

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use std::vec;

use geojson::{GeoJson, PolygonType, Position, Value};
use log::debug;
use smallvec::SmallVec;

use crate::error::{Error, FeatureError};
use crate::geometry::{Geometry, Point, Polygon};

type Converted = SmallVec<[Result<Geometry, FeatureError>; 1]>;

/// Iterator over the geometries of a GeoJSON document
///
/// A document may be a single geometry, a feature or a feature collection.
/// Every feature is only converted once the iterator reaches it.
/// Multi geometries and geometry collections are split into their members.
pub struct GeoJsonSource {
    features: vec::IntoIter<Option<geojson::Geometry>>,

    /// Converted geometries of the current feature in reverse order
    pending: Converted,
}

impl GeoJsonSource {
    pub fn open(path: impl AsRef<Path>) -> Result<GeoJsonSource, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = GeoJsonSource::from(GeoJson::from_reader(BufReader::new(file))?);
        debug!(
            "Read {} features from {}",
            source.features.len(),
            path.display()
        );
        Ok(source)
    }
}

impl From<GeoJson> for GeoJsonSource {
    fn from(geojson: GeoJson) -> Self {
        let features = match geojson {
            GeoJson::Geometry(geometry) => vec![Some(geometry)],
            GeoJson::Feature(feature) => vec![feature.geometry],
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .map(|feature| feature.geometry)
                .collect(),
        };
        GeoJsonSource {
            features: features.into_iter(),
            pending: SmallVec::new(),
        }
    }
}

impl FromStr for GeoJsonSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(GeoJsonSource::from(s.parse::<GeoJson>()?))
    }
}

impl Iterator for GeoJsonSource {
    type Item = Result<Geometry, FeatureError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(geometry) = self.pending.pop() {
                return Some(geometry);
            }
            match self.features.next()? {
                None => return Some(Err(FeatureError::Empty)),
                Some(geometry) => {
                    convert(geometry.value, &mut self.pending);
                    self.pending.reverse();
                }
            }
        }
    }
}

fn convert(value: Value, into: &mut Converted) {
    match value {
        Value::Polygon(rings) => into.push(polygon(rings)),
        Value::MultiPolygon(polygons) => into.extend(polygons.into_iter().map(polygon)),
        Value::LineString(line) => into.push(positions(line).map(Geometry::Line)),
        Value::MultiLineString(lines) => into.extend(
            lines
                .into_iter()
                .map(|line| positions(line).map(Geometry::Line)),
        ),
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                convert(geometry.value, into);
            }
        }
        Value::Point(_) => into.push(Err(FeatureError::Unsupported("Point"))),
        Value::MultiPoint(_) => into.push(Err(FeatureError::Unsupported("MultiPoint"))),
    }
}

fn polygon(rings: PolygonType) -> Result<Geometry, FeatureError> {
    if rings.is_empty() {
        return Err(FeatureError::Empty);
    }
    let rings = rings
        .into_iter()
        .map(positions)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Geometry::Polygon(Polygon { rings }))
}

fn positions(positions: Vec<Position>) -> Result<Vec<Point>, FeatureError> {
    positions.into_iter().map(position).collect()
}

fn position(position: Position) -> Result<Point, FeatureError> {
    if let &[lon, lat, ..] = position.as_slice() {
        if lon.is_finite() && lat.is_finite() {
            return Ok(Point::new(lon, lat));
        }
    }
    Err(FeatureError::Coordinate(position))
}
