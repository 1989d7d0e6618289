//! Geodetic <-> local frame conversion.

use crate::models::{GlobalPosition, LocalPosition};

/// Converts between geodetic coordinates and the local NED frame around home.
pub trait FrameConverter {
    fn global_to_local(&self, point: GlobalPosition, home: GlobalPosition) -> LocalPosition;

    fn local_to_global(&self, point: LocalPosition, home: GlobalPosition) -> GlobalPosition;
}

/// Flat-earth tangent plane at home, scaled by latitude-aware meters per degree.
///
/// Accurate to well under a meter across the few kilometers a colliders map covers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTangentFrame;

impl FrameConverter for LocalTangentFrame {
    fn global_to_local(&self, point: GlobalPosition, home: GlobalPosition) -> LocalPosition {
        LocalPosition {
            north: lat_to_meters(point.lat - home.lat, home.lat),
            east: lon_to_meters(point.lon - home.lon, home.lat),
            down: home.altitude_m - point.altitude_m,
        }
    }

    fn local_to_global(&self, point: LocalPosition, home: GlobalPosition) -> GlobalPosition {
        GlobalPosition {
            lat: home.lat + meters_to_lat(point.north, home.lat),
            lon: home.lon + meters_to_lon(point.east, home.lat),
            altitude_m: home.altitude_m - point.down,
        }
    }
}

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

pub fn meters_to_lat(meters: f64, ref_lat_deg: f64) -> f64 {
    meters / meters_per_deg_lat(ref_lat_deg).max(1e-9)
}

pub fn meters_to_lon(meters: f64, ref_lat_deg: f64) -> f64 {
    meters / meters_per_deg_lon(ref_lat_deg).max(1e-9)
}

pub fn lat_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lat(ref_lat_deg)
}

pub fn lon_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lon(ref_lat_deg)
}
