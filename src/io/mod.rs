pub mod arrow;
pub mod cache;
pub mod decode;
pub mod fetch;
pub mod writer;

pub use arrow::{TrainingPairsToArrow, training_schema};
pub use cache::{PayloadOrigin, TileCache};
pub use decode::{RasterPixels, decode_raster};
pub use fetch::{HttpFetcher, RetryingFetcher, TileFetcher, TileSource};
pub use writer::{TrainingPairsToParquet, write_parquet, write_training_pairs};
