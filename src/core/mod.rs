pub mod constants;
pub mod projection;
pub mod tiles;
pub mod types;

pub use constants::{MAX_MERCATOR_LATITUDE, MAX_ZOOM_LEVEL, SIN_LATITUDE_BOUND, TILE_SIZE};
pub use projection::{
    coordinate_to_global_pixel, coordinate_to_tile, global_pixel_to_coordinate,
    global_pixel_to_tile_local, mercator_fraction, normalize_longitude, tile_bounds, tile_origin,
};
pub use tiles::{TileGrid, tiles_in_bounding_box};
pub use types::{BoundingBox, Coordinate, PixelCoordinate, TileAddress};
