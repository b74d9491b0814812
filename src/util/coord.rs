use crate::core::types::Coordinate;
use geo_types::{Coord, Point};

/// Trait for types that can provide a geographic position.
///
/// Implemented for `(f64, f64)` tuples in GeoJSON `(lon, lat)` order,
/// `geo_types::Point<f64>`, `geo_types::Coord<f64>` and [`Coordinate`].
/// This allows the projection functions to accept any of them.
pub trait GeoPoint {
    /// Returns the longitude in degrees.
    fn lon(&self) -> f64;
    /// Returns the latitude in degrees.
    fn lat(&self) -> f64;
}

impl GeoPoint for (f64, f64) {
    fn lon(&self) -> f64 {
        self.0
    }
    fn lat(&self) -> f64 {
        self.1
    }
}

impl GeoPoint for Point<f64> {
    fn lon(&self) -> f64 {
        self.x()
    }
    fn lat(&self) -> f64 {
        self.y()
    }
}

impl GeoPoint for Coord<f64> {
    fn lon(&self) -> f64 {
        self.x
    }
    fn lat(&self) -> f64 {
        self.y
    }
}

impl GeoPoint for Coordinate {
    fn lon(&self) -> f64 {
        self.lon
    }
    fn lat(&self) -> f64 {
        self.lat
    }
}
