use crate::core::constants::TILE_SIZE;
use crate::core::projection::{coordinate_to_global_pixel, global_pixel_to_tile_local};
use crate::core::types::{PixelCoordinate, TileAddress};
use crate::util::error::RoadTilesError;
use geo_types::LineString;
use std::collections::HashSet;

/// Returns the on-tile pixels along the segment from `start` to `end`.
///
/// Both endpoints are tile-local and may lie outside the tile. A vertical
/// segment yields every pixel in `[min(y0, y1), max(y0, y1))`. Any other
/// segment is sampled at `TILE_SIZE` evenly spaced x positions between the
/// endpoints, so work per segment is bounded but very steep segments can
/// leave gaps. Pixels outside `[0, TILE_SIZE)²` are dropped.
///
/// # Example
/// ```
/// use roadtiles::{PixelCoordinate, pixels_between};
///
/// let pixels = pixels_between(PixelCoordinate::new(5, 10), PixelCoordinate::new(5, 20));
/// assert_eq!(pixels.len(), 10);
/// assert!(pixels.iter().all(|p| p.x == 5));
/// ```
pub fn pixels_between(start: PixelCoordinate, end: PixelCoordinate) -> Vec<PixelCoordinate> {
    if end.x == start.x {
        return (start.y.min(end.y)..start.y.max(end.y))
            .map(|y| PixelCoordinate::new(end.x, y))
            .filter(PixelCoordinate::is_on_tile)
            .collect();
    }

    let dx = (end.x - start.x) as f64;
    let slope = (end.y - start.y) as f64 / dx;
    let offset = end.y as f64 - slope * end.x as f64;

    let steps = TILE_SIZE as f64;
    (0..TILE_SIZE)
        .filter_map(|i| {
            let x = start.x as f64 + dx * i as f64 / steps;
            let pixel = PixelCoordinate::new(x as i64, (offset + slope * x) as i64);
            pixel.is_on_tile().then_some(pixel)
        })
        .collect()
}

/// Rasterizes a geographic polyline onto `tile`.
///
/// The line is read in GeoJSON order (x = longitude, y = latitude). Every
/// consecutive pair of positions is projected at the tile's zoom, moved
/// into the tile's pixel frame and walked with [`pixels_between`]. The
/// result is the union over all segments and is always inside the tile; a
/// line that never touches the tile gives an empty set.
pub fn rasterize_line(
    line: &LineString<f64>,
    tile: &TileAddress,
) -> Result<HashSet<PixelCoordinate>, RoadTilesError> {
    let mut pixels = HashSet::new();

    for window in line.0.windows(2) {
        let start = coordinate_to_global_pixel(&window[0], tile.z)?;
        let end = coordinate_to_global_pixel(&window[1], tile.z)?;

        pixels.extend(pixels_between(
            global_pixel_to_tile_local(start, tile),
            global_pixel_to_tile_local(end, tile),
        ));
    }

    Ok(pixels)
}
