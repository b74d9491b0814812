//! Spherical Mercator projection between geographic coordinates, global
//! pixels and tile-local pixels.
//!
//! Tile addresses and global pixels are both derived from the same
//! normalized Mercator fraction, so `pixel / TILE_SIZE` always lands in
//! the tile returned by [`coordinate_to_tile`] for positions inside the
//! Mercator square. Final integer coordinates are truncated toward zero.

use crate::core::constants::{MAX_ZOOM_LEVEL, SIN_LATITUDE_BOUND, TILE_SIZE};
use crate::core::types::{BoundingBox, Coordinate, PixelCoordinate, TileAddress};
use crate::util::coord::GeoPoint;
use crate::util::error::RoadTilesError;
use std::f64::consts::PI;

fn check_zoom(zoom: u8) -> Result<(), RoadTilesError> {
    if zoom > MAX_ZOOM_LEVEL {
        return Err(RoadTilesError::InvalidZoomLevel(zoom));
    }
    Ok(())
}

/// Number of tiles along one axis at `zoom`.
fn tiles_per_axis(zoom: u8) -> f64 {
    (1u64 << zoom) as f64
}

/// Shifts longitudes above 180° down by 360°.
///
/// Must run before any projection; vector sources occasionally emit
/// longitudes past the antimeridian.
pub fn normalize_longitude<C: GeoPoint>(coord: &C) -> Coordinate {
    let lon = coord.lon();
    let lon = if lon > 180.0 { lon - 360.0 } else { lon };
    Coordinate::new(coord.lat(), lon)
}

/// Projects a coordinate to the unit Mercator square.
///
/// Returns `(fx, fy)` where both are in `[0, 1]` inside the square, with
/// `fy` growing southwards. `sin(lat)` is clamped to ±[`SIN_LATITUDE_BOUND`]
/// so poles stay finite.
pub fn mercator_fraction<C: GeoPoint>(coord: &C) -> (f64, f64) {
    let c = normalize_longitude(coord);

    let fx = c.lon / 360.0 + 0.5;

    // ln(tan(pi/4 + lat/2)) == 0.5 * ln((1 + sin) / (1 - sin))
    let sin_lat = c
        .lat
        .to_radians()
        .sin()
        .clamp(-SIN_LATITUDE_BOUND, SIN_LATITUDE_BOUND);
    let fy = 0.5 - 0.5 * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (2.0 * PI);

    (fx, fy)
}

/// Returns the tile containing `coord` at `zoom`.
///
/// # Example
/// ```
/// use roadtiles::coordinate_to_tile;
///
/// # fn main() -> Result<(), roadtiles::RoadTilesError> {
/// let tile = coordinate_to_tile(&(-74.0060, 40.7128), 16)?;
/// assert_eq!((tile.x, tile.y, tile.z), (19295, 24640, 16));
/// # Ok(())
/// # }
/// ```
pub fn coordinate_to_tile<C: GeoPoint>(coord: &C, zoom: u8) -> Result<TileAddress, RoadTilesError> {
    check_zoom(zoom)?;

    let (fx, fy) = mercator_fraction(coord);
    let scale = tiles_per_axis(zoom);

    Ok(TileAddress::new((fx * scale) as i64, (fy * scale) as i64, zoom))
}

/// Returns the global pixel of `coord` at `zoom`.
///
/// The pixel grid spans `TILE_SIZE * 2^zoom` pixels per axis.
pub fn coordinate_to_global_pixel<C: GeoPoint>(
    coord: &C,
    zoom: u8,
) -> Result<PixelCoordinate, RoadTilesError> {
    check_zoom(zoom)?;

    let (fx, fy) = mercator_fraction(coord);
    let world = TILE_SIZE as f64 * tiles_per_axis(zoom);

    Ok(PixelCoordinate::new((fx * world) as i64, (fy * world) as i64))
}

/// Converts a global pixel to the pixel frame of `tile`.
///
/// The result may fall outside `[0, TILE_SIZE)`; the rasterizer relies on
/// that to clip points belonging to neighbouring tiles.
pub fn global_pixel_to_tile_local(pixel: PixelCoordinate, tile: &TileAddress) -> PixelCoordinate {
    let origin = tile.origin_pixel();
    PixelCoordinate::new(pixel.x - origin.x, pixel.y - origin.y)
}

/// Inverse projection of a (possibly fractional) global pixel position.
pub fn global_pixel_to_coordinate(
    pixel_x: f64,
    pixel_y: f64,
    zoom: u8,
) -> Result<Coordinate, RoadTilesError> {
    check_zoom(zoom)?;

    let world = TILE_SIZE as f64 * tiles_per_axis(zoom);
    let fx = pixel_x / world;
    let fy = pixel_y / world;

    let lon = (fx - 0.5) * 360.0;
    let lat = (PI * (1.0 - 2.0 * fy)).sinh().atan().to_degrees();

    Ok(Coordinate::new(lat, lon))
}

/// Returns the geographic position of the tile's north-west corner.
pub fn tile_origin(tile: &TileAddress) -> Result<Coordinate, RoadTilesError> {
    let origin = tile.origin_pixel();
    global_pixel_to_coordinate(origin.x as f64, origin.y as f64, tile.z)
}

/// Returns the geographic extent of a tile.
pub fn tile_bounds(tile: &TileAddress) -> Result<BoundingBox, RoadTilesError> {
    let northwest = tile_origin(tile)?;
    let southeast = tile_origin(&TileAddress::new(tile.x + 1, tile.y + 1, tile.z))?;

    Ok(BoundingBox::new(
        Coordinate::new(northwest.lat, southeast.lon),
        Coordinate::new(southeast.lat, northwest.lon),
    ))
}
