//! Core data models for the roadmap planner.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A 2D point in the planning plane (meters, north/east).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub north: f64,
    pub east: f64,
}

impl Point2 {
    pub const fn new(north: f64, east: f64) -> Self {
        Self { north, east }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point2) -> f64 {
        let dn = other.north - self.north;
        let de = other.east - self.east;
        (dn * dn + de * de).sqrt()
    }

    pub fn offset(&self, north: f64, east: f64) -> Point2 {
        Point2::new(self.north + north, self.east + east)
    }

    /// Total order by north then east, used to break ties deterministically.
    pub fn total_cmp(&self, other: &Point2) -> Ordering {
        self.north
            .total_cmp(&other.north)
            .then_with(|| self.east.total_cmp(&other.east))
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((north, east): (f64, f64)) -> Self {
        Self { north, east }
    }
}

/// One obstacle record: a box centered at (north, east, alt) with half sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    pub north: f64,
    pub east: f64,
    pub alt: f64,
    pub half_size_north: f64,
    pub half_size_east: f64,
    pub half_size_alt: f64,
}

impl ObstacleRecord {
    pub const fn new(
        north: f64,
        east: f64,
        alt: f64,
        half_size_north: f64,
        half_size_east: f64,
        half_size_alt: f64,
    ) -> Self {
        Self {
            north,
            east,
            alt,
            half_size_north,
            half_size_east,
            half_size_alt,
        }
    }

    /// True if the obstacle top, inflated by `safety_margin`, reaches `planning_altitude`.
    pub fn reaches_altitude(&self, planning_altitude: f64, safety_margin: f64) -> bool {
        self.alt + self.half_size_alt + safety_margin > planning_altitude
    }

    pub(crate) fn values(&self) -> [f64; 6] {
        [
            self.north,
            self.east,
            self.alt,
            self.half_size_north,
            self.half_size_east,
            self.half_size_alt,
        ]
    }
}

/// Geodetic position in decimal degrees and meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalPosition {
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
}

impl GlobalPosition {
    pub const fn new(lat: f64, lon: f64, altitude_m: f64) -> Self {
        Self {
            lat,
            lon,
            altitude_m,
        }
    }
}

/// Position in the local NED frame relative to home.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalPosition {
    pub north: f64,
    pub east: f64,
    pub down: f64,
}

impl LocalPosition {
    pub const fn new(north: f64, east: f64, down: f64) -> Self {
        Self { north, east, down }
    }

    /// Projection onto the planning plane.
    pub fn horizontal(&self) -> Point2 {
        Point2::new(self.north, self.east)
    }
}

/// Waypoint handed to the flight controller, in the local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub north: i64,
    pub east: i64,
    pub altitude_m: f64,
    /// Heading in radians; always 0 from this planner.
    pub heading: f64,
}
