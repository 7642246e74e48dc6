//! Geodetic to local planar conversion.

use part77_core::Point2;

pub const FEET_PER_METER: f64 = 1.0 / 0.3048;

// ==== ENU (East-North-Up) Coordinate Conversion ====
// Latitude-aware scaling between degrees and linear distance.

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Project `point` `(lat, lon)` in decimal degrees onto the local frame
/// centred on `origin`: x east, y north, in feet.
///
/// Scaling uses the mean latitude of the two positions, which is accurate
/// to well under a foot across an airport-sized area.
pub fn degrees_to_feet(point: (f64, f64), origin: (f64, f64)) -> Point2 {
    let ref_lat = (point.0 + origin.0) / 2.0;
    let north_m = (point.0 - origin.0) * meters_per_deg_lat(ref_lat);
    let east_m = (point.1 - origin.1) * meters_per_deg_lon(ref_lat);
    Point2::new(east_m * FEET_PER_METER, north_m * FEET_PER_METER)
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet / FEET_PER_METER
}
