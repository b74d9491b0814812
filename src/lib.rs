//! # roadtiles
//!
//! Turns road vector tiles into per-tile label matrices that line up
//! pixel for pixel with satellite raster tiles of the same slippy-map
//! address. There are currently three main entry points.
//!
//! ### 1. Projection - Coordinates, Tiles and Pixels
//!
//! ```
//! use roadtiles::{Coordinate, coordinate_to_global_pixel, coordinate_to_tile};
//!
//! # fn main() -> Result<(), roadtiles::RoadTilesError> {
//! let nyc = Coordinate::new(40.7128, -74.0060);
//! let tile = coordinate_to_tile(&nyc, 16)?;
//! assert_eq!((tile.x, tile.y), (19295, 24640));
//!
//! let pixel = coordinate_to_global_pixel(&nyc, 16)?;
//! assert_eq!(pixel.x.div_euclid(256), tile.x);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `TileMatrixBuilder` - Road Labels for One Tile
//!
//! ```
//! use roadtiles::{TileAddress, TileMatrixBuilder, tiles_in_bounding_box, BoundingBox, Coordinate};
//! use geo_types::line_string;
//!
//! # fn main() -> Result<(), roadtiles::RoadTilesError> {
//! let region = BoundingBox::new(
//!     Coordinate::new(37.81385, -119.48559),
//!     Coordinate::new(37.66724, -119.72454),
//! );
//! let tiles = tiles_in_bounding_box(&region, 12)?;
//! assert_eq!(tiles.len(), 6);
//!
//! let road = line_string![(x: -119.69, y: 37.77), (x: -119.64, y: 37.73)];
//! let mut builder = TileMatrixBuilder::new(TileAddress::new(686, 1583, 12));
//! builder.add_line(&road)?;
//! let label = builder.build();
//! assert!(label.count_set() > 0);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `Pipeline` - Training Data for a Region
//!
//! Download vector and raster tiles into a local cache, pair them and
//! write the result to Parquet:
//!
//! ```no_run
//! use roadtiles::{Pipeline, PipelineConfig};
//!
//! # fn main() -> Result<(), roadtiles::RoadTilesError> {
//! let config = PipelineConfig::default()
//!     .zoom_level(12)
//!     .vector_api_key("my-key")
//!     .output_path("data/yosemite.parquet");
//!
//! let summary = Pipeline::with_http(config)?.run()?;
//! println!("{} pairs from {} tiles", summary.pairs, summary.tiles);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod core;
pub mod geom;
pub mod io;
pub mod raster;
pub mod util;

pub use api::{DownloadReport, Pipeline, PipelineConfig, RunSummary, TrainingPair, label_tile};
pub use core::{
    BoundingBox, Coordinate, MAX_MERCATOR_LATITUDE, MAX_ZOOM_LEVEL, PixelCoordinate,
    SIN_LATITUDE_BOUND, TILE_SIZE, TileAddress, TileGrid, coordinate_to_global_pixel,
    coordinate_to_tile, global_pixel_to_coordinate, global_pixel_to_tile_local,
    mercator_fraction, normalize_longitude, tile_bounds, tile_origin, tiles_in_bounding_box,
};
pub use geom::linestrings_for_vector_tile;
pub use io::{
    HttpFetcher, PayloadOrigin, RasterPixels, RetryingFetcher, TileCache, TileFetcher, TileSource,
    TrainingPairsToArrow, TrainingPairsToParquet, decode_raster, training_schema, write_parquet,
    write_training_pairs,
};
pub use raster::{BuildState, TileMatrix, TileMatrixBuilder, add_line, pixels_between, rasterize_line};
pub use util::{GeoPoint, RoadTilesError, init_logging};

pub use geo_types;
