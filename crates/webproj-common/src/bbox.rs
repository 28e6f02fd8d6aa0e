//! Area-of-interest bounding boxes.

use serde::{Deserialize, Serialize};

/// A geographic bounding rectangle in degrees.
///
/// Used to pick the most accurate operation when the engine knows several
/// candidates for a CRS pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl AreaOfInterest {
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// The whole globe.
    pub const fn world() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Check if a (lon, lat) point lies within this area.
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    /// Whether the corners describe a usable rectangle.
    pub fn is_valid(&self) -> bool {
        [self.west, self.south, self.east, self.north]
            .iter()
            .all(|v| v.is_finite())
            && self.west < self.east
            && self.south < self.north
            && self.south >= -90.0
            && self.north <= 90.0
    }
}
