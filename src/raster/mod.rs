pub mod line;
pub mod matrix;

pub use line::{pixels_between, rasterize_line};
pub use matrix::{BuildState, TileMatrix, TileMatrixBuilder, add_line};
