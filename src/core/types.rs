use crate::core::constants::{MAX_MERCATOR_LATITUDE, TILE_SIZE};
use geo_types::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A geographic region given by two opposite corners.
///
/// The corners may arrive in either order; the tile enumerator takes the
/// min/max of the projected corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub northeast: Coordinate,
    pub southwest: Coordinate,
}

impl BoundingBox {
    pub const fn new(northeast: Coordinate, southwest: Coordinate) -> Self {
        Self {
            northeast,
            southwest,
        }
    }

    /// The whole square Mercator world.
    pub const fn world() -> Self {
        Self::new(
            Coordinate::new(MAX_MERCATOR_LATITUDE, 180.0),
            Coordinate::new(-MAX_MERCATOR_LATITUDE, -180.0),
        )
    }

    /// Builds a bounding box from a `geo_types::Rect` in lon/lat order.
    pub fn from_rect(rect: &Rect<f64>) -> Self {
        Self::new(
            Coordinate::new(rect.max().y, rect.max().x),
            Coordinate::new(rect.min().y, rect.min().x),
        )
    }
}

/// One tile of the power-of-two tile pyramid.
///
/// At zoom `z` there are `2^z * 2^z` tiles. `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileAddress {
    pub x: i64,
    pub y: i64,
    pub z: u8,
}

impl TileAddress {
    pub const fn new(x: i64, y: i64, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Global pixel of this tile's north-west corner.
    pub const fn origin_pixel(&self) -> PixelCoordinate {
        PixelCoordinate::new(self.x * TILE_SIZE as i64, self.y * TILE_SIZE as i64)
    }

    /// Returns `true` if the tile exists at its zoom level.
    pub fn is_valid(&self) -> bool {
        let n = 1i64 << self.z;
        (0..n).contains(&self.x) && (0..n).contains(&self.y)
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// A pixel position, either global to a zoom level or local to one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelCoordinate {
    pub x: i64,
    pub y: i64,
}

impl PixelCoordinate {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if this tile-local pixel lies in `[0, TILE_SIZE)²`.
    pub fn is_on_tile(&self) -> bool {
        let size = TILE_SIZE as i64;
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }
}
