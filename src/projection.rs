//! Spherical mercator (EPSG:3857) projection and tile coordinate conversions
//!
//! Planar coordinates are meters in the range `[-MERCATOR_MAX, MERCATOR_MAX]`.
//! Tile coordinates are fractional column / row numbers at a given zoom,
//! with rows counting from the north.

use std::f64::consts::PI;

use crate::geometry::Point;

pub const EARTH_RADIUS: f64 = 6378137.0;
pub const EARTH_CIRCUMFERENCE: f64 = EARTH_RADIUS * 2.0 * PI;
pub const MERCATOR_MAX: f64 = EARTH_CIRCUMFERENCE / 2.0;

/// Latitude above which [`lat_to_y`] leaves its polynomial approximation
pub const FAST_LATITUDE_LIMIT: f64 = 78.0;

/// Highest zoom level whose tile indexes and edges are still exact
pub const MAX_ZOOM: u8 = 30;

#[inline]
fn in_bounds(value: f64) -> f64 {
    value.clamp(-MERCATOR_MAX, MERCATOR_MAX)
}

/// Longitude in degrees to planar x
///
/// Computed as a fraction of the circumference so that longitudes lying on a tile edge
/// produce the same bits as [`tile_x_to_merc_x`].
#[inline]
pub fn lon_to_x(lon: f64) -> f64 {
    in_bounds(lon / 360.0 * EARTH_CIRCUMFERENCE)
}

/// Planar x to longitude in degrees
#[inline]
pub fn x_to_lon(x: f64) -> f64 {
    x / EARTH_CIRCUMFERENCE * 360.0
}

/// Latitude in degrees to planar y using the closed form
pub fn lat_to_y_exact(lat: f64) -> f64 {
    in_bounds(EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln())
}

/// Latitude in degrees to planar y
///
/// Between ±78° a rational polynomial replaces `ln(tan(..))`.
/// It agrees with [`lat_to_y_exact`] to well below a millimeter.
pub fn lat_to_y(lat: f64) -> f64 {
    if !(-FAST_LATITUDE_LIMIT..=FAST_LATITUDE_LIMIT).contains(&lat) {
        return lat_to_y_exact(lat);
    }

    #[rustfmt::skip]
    let numerator = (((((((((-3.1112583378460085319e-23  * lat +
                              2.0465852743943268009e-19) * lat +
                              6.4905282018672673884e-18) * lat +
                             -1.9685447939983315591e-14) * lat +
                             -2.2022588158115104182e-13) * lat +
                              5.1617537365509453239e-10) * lat +
                              2.5380136069803016519e-9)  * lat +
                             -5.1448323697228488745e-6)  * lat +
                             -9.4888671473357768301e-6)  * lat +
                              1.7453292518154191887e-2)  * lat;

    #[rustfmt::skip]
    let denominator = (((((((((-1.9741136066814230637e-22  * lat +
                               -1.258514031244679556e-20)  * lat +
                                4.8141483273572351796e-17) * lat +
                                8.6876090870176172185e-16) * lat +
                               -2.3298743439377541768e-12) * lat +
                               -1.9300094785736130185e-11) * lat +
                                4.3251609106864178231e-8)  * lat +
                                1.7301944508516974048e-7)  * lat +
                               -3.4554675198786337842e-4)  * lat +
                               -5.4367203601085991108e-4)  * lat + 1.0;

    EARTH_RADIUS * numerator / denominator
}

/// Planar y to latitude in degrees
pub fn y_to_lat(y: f64) -> f64 {
    (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees()
}

/// Factor by which distances on the ground are stretched in the plane at a given latitude
pub fn mercator_scale(lat: f64) -> f64 {
    1.0 / lat.to_radians().cos()
}

/// Number of tiles along each axis
#[inline]
pub fn tile_count(zoom: u8) -> u32 {
    1 << zoom
}

/// Width (and height) of a single tile in planar meters
#[inline]
pub fn tile_width(zoom: u8) -> f64 {
    EARTH_CIRCUMFERENCE / tile_count(zoom) as f64
}

#[inline]
fn in_tile_bounds(value: f64, zoom: u8) -> f64 {
    value.clamp(0.0, (tile_count(zoom) - 1) as f64)
}

pub fn merc_x_to_tile_x(x: f64, zoom: u8) -> f64 {
    in_tile_bounds((x / EARTH_CIRCUMFERENCE + 0.5) * tile_count(zoom) as f64, zoom)
}

pub fn merc_y_to_tile_y(y: f64, zoom: u8) -> f64 {
    in_tile_bounds(
        (1.0 - (y / EARTH_CIRCUMFERENCE + 0.5)) * tile_count(zoom) as f64,
        zoom,
    )
}

/// Planar x of a tile column's western edge
///
/// `x / 2^zoom - 0.5` is exact, so a column edge has the same bits on every zoom level sharing it.
pub fn tile_x_to_merc_x(x: f64, zoom: u8) -> f64 {
    (x / tile_count(zoom) as f64 - 0.5) * EARTH_CIRCUMFERENCE
}

/// Planar y of a tile row's northern edge
pub fn tile_y_to_merc_y(y: f64, zoom: u8) -> f64 {
    (0.5 - y / tile_count(zoom) as f64) * EARTH_CIRCUMFERENCE
}

/// Maps geographic points (longitude, latitude in degrees) into the plane used for tiling
pub trait Projection: Copy + Send + 'static {
    fn project(&self, point: Point) -> Point {
        let (x, y) = self._project(point.x, point.y);
        Point::new(x, y)
    }

    fn _project(&self, lon: f64, lat: f64) -> (f64, f64);
}

/// Web mercator using the polynomial approximation for moderate latitudes
#[derive(Copy, Clone, Debug, Default)]
pub struct WebMercator;
impl Projection for WebMercator {
    #[inline]
    fn _project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon_to_x(lon), lat_to_y(lat))
    }
}

/// Web mercator using `ln(tan(..))` for every latitude
#[derive(Copy, Clone, Debug, Default)]
pub struct ExactWebMercator;
impl Projection for ExactWebMercator {
    #[inline]
    fn _project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon_to_x(lon), lat_to_y_exact(lat))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_close(a: f64, b: f64, tolerance: f64) {
        assert!((a - b).abs() <= tolerance, "{a} and {b} differ by more than {tolerance}");
    }

    #[test]
    fn fast_latitude_matches_exact() {
        let mut lat = -FAST_LATITUDE_LIMIT;
        while lat <= FAST_LATITUDE_LIMIT {
            let exact = lat_to_y_exact(lat);
            assert_close(lat_to_y(lat), exact, 1e-7 * exact.abs().max(1.0));
            lat += 0.25;
        }
    }

    #[test]
    fn no_jump_at_fast_path_limit() {
        let below = lat_to_y(FAST_LATITUDE_LIMIT);
        let above = lat_to_y(FAST_LATITUDE_LIMIT + 1e-9);
        assert_close(below, above, 1e-7 * below);

        let below = lat_to_y(-FAST_LATITUDE_LIMIT);
        let above = lat_to_y(-FAST_LATITUDE_LIMIT - 1e-9);
        assert_close(below, above, 1e-7 * below.abs());
    }

    #[test]
    fn poles_are_clamped() {
        assert_eq!(lat_to_y(90.0), MERCATOR_MAX);
        assert_eq!(lat_to_y(-90.0), -MERCATOR_MAX);
        assert_eq!(lon_to_x(200.0), MERCATOR_MAX);
        assert_eq!(lon_to_x(-180.0), -MERCATOR_MAX);
        assert_close(y_to_lat(MERCATOR_MAX), 85.0511287798, 1e-9);
    }

    #[test]
    fn latitude_round_trip() {
        for lat in [-85.0, -60.0, -12.5, 0.0, 33.3, 78.0, 80.0] {
            assert_close(y_to_lat(lat_to_y_exact(lat)), lat, 1e-9);
        }
        assert_eq!(lat_to_y(0.0), 0.0);
    }

    #[test]
    fn longitude_round_trip() {
        for lon in [-180.0, -97.25, 0.0, 13.4, 180.0] {
            assert_close(x_to_lon(lon_to_x(lon)), lon, 1e-9);
        }
        assert_eq!(x_to_lon(MERCATOR_MAX), 180.0);
    }

    #[test]
    fn tile_coordinates() {
        assert_eq!(tile_count(0), 1);
        assert_eq!(tile_count(14), 16384);
        assert_eq!(merc_x_to_tile_x(0.0, 1), 1.0);
        assert_eq!(merc_y_to_tile_y(0.0, 1), 1.0);
        assert_eq!(merc_x_to_tile_x(MERCATOR_MAX, 3), 7.0);
        assert_eq!(merc_y_to_tile_y(MERCATOR_MAX, 3), 0.0);
        assert_eq!(merc_y_to_tile_y(-MERCATOR_MAX, 3), 7.0);
        assert_eq!(tile_x_to_merc_x(0.0, 5), -MERCATOR_MAX);
        assert_eq!(tile_y_to_merc_y(0.0, 5), MERCATOR_MAX);
        assert_close(tile_width(1), MERCATOR_MAX, 1e-9);
    }

    #[test]
    fn aligned_longitudes_hit_tile_edges() {
        assert_eq!(lon_to_x(90.0), tile_x_to_merc_x(3.0, 2));
        assert_eq!(lon_to_x(-45.0), tile_x_to_merc_x(3.0, 3));
        assert_eq!(tile_x_to_merc_x(3.0, 2), tile_x_to_merc_x(12.0, 4));
        assert_eq!(tile_y_to_merc_y(5.0, 3), tile_y_to_merc_y(20.0, 5));
    }

    #[test]
    fn scale_grows_towards_poles() {
        assert_eq!(mercator_scale(0.0), 1.0);
        assert_close(mercator_scale(60.0), 2.0, 1e-12);
        assert!(mercator_scale(80.0) > mercator_scale(70.0));
    }
}
