use geo::{Coord, Geometry, MapCoordsInPlace};
use std::f64::consts::PI;

/// WGS84 semi-major axis, in meters
const RADIUS: f64 = 6_378_137.0;

/// Latitude bound of the square Web Mercator world
const MAX_LAT: f64 = 85.051_128_779_806_59;

///
/// EPSG:4326 lng/lat degrees => EPSG:3857 meters
///
pub fn to_mercator(c: Coord<f64>) -> Coord<f64> {
    let lat = c.y.max(-MAX_LAT).min(MAX_LAT);

    Coord {
        x: RADIUS * c.x.to_radians(),
        y: RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln()
    }
}

///
/// EPSG:3857 meters => EPSG:4326 lng/lat degrees
///
pub fn to_wgs84(c: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (c.x / RADIUS).to_degrees(),
        y: (2.0 * (c.y / RADIUS).exp().atan() - PI / 2.0).to_degrees()
    }
}

pub fn project(geom: &mut Geometry<f64>) {
    geom.map_coords_in_place(to_mercator);
}

pub fn unproject(geom: &mut Geometry<f64>) {
    geom.map_coords_in_place(to_wgs84);
}
