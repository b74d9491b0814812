/// Edge length in pixels of every tile, label matrix and raster payload.
pub const TILE_SIZE: usize = 256;

/// Maximum supported zoom level.
///
/// At zoom 24 the global pixel grid is `256 * 2^24` wide, far inside `i64`.
pub const MAX_ZOOM_LEVEL: u8 = 24;

/// Clamp applied to `sin(lat)` before the Mercator logarithm.
///
/// Limits usable latitude to roughly ±89.19°.
pub const SIN_LATITUDE_BOUND: f64 = 0.9999;

/// Latitude of the top and bottom edges of the square Mercator world.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;
