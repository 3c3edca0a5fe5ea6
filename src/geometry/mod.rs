pub mod bbox;
pub mod buffer;
pub mod grid;
pub mod polygon;
pub mod polyline;
pub mod primitives;

pub use bbox::BBox;
pub use buffer::{buffer, BufferedGeometry};
pub use polygon::Polygon;

use crate::projection::Projection;

/// Either a geographic (longitude, latitude) or a planar (x, y) position
///
/// Which one is documented by the function producing or consuming it.
pub type Point = nalgebra::Vector2<f64>;

/// A single polygon or line as handed over by a [`source`](crate::source)
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    Line(Vec<Point>),
}

impl Geometry {
    /// Project every point from geographic into planar coordinates
    pub fn project(&self, projection: &impl Projection) -> Geometry {
        match self {
            Geometry::Polygon(polygon) => Geometry::Polygon(Polygon {
                rings: polygon
                    .rings
                    .iter()
                    .map(|ring| ring.iter().map(|&point| projection.project(point)).collect())
                    .collect(),
            }),
            Geometry::Line(line) => {
                Geometry::Line(line.iter().map(|&point| projection.project(point)).collect())
            }
        }
    }

    pub fn bbox(&self) -> BBox {
        match self {
            Geometry::Polygon(polygon) => polygon.bbox(),
            Geometry::Line(line) => line.iter().copied().collect(),
        }
    }

    pub fn points(&self) -> usize {
        match self {
            Geometry::Polygon(polygon) => polygon.rings.iter().map(Vec::len).sum(),
            Geometry::Line(line) => line.len(),
        }
    }

    /// Name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Polygon(_) => "polygon",
            Geometry::Line(_) => "line",
        }
    }
}
