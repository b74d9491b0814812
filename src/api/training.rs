use crate::core::types::TileAddress;
use crate::geom::linestrings_for_vector_tile;
use crate::io::decode::RasterPixels;
use crate::raster::matrix::{TileMatrix, TileMatrixBuilder};
use crate::util::error::RoadTilesError;

/// Builds the road label of one tile from its GeoJSON vector payload.
///
/// Every line of the payload is rasterized against `tile`; roads that
/// only pass through neighbouring tiles leave no mark.
pub fn label_tile(tile: &TileAddress, geojson: &str) -> Result<TileMatrix, RoadTilesError> {
    let lines = linestrings_for_vector_tile(geojson)?;

    let mut builder = TileMatrixBuilder::new(*tile);
    for line in &lines {
        builder.add_line(line)?;
    }
    Ok(builder.build())
}

/// A label matrix and the raster pixels of the same tile.
///
/// Construction fails unless the raster is exactly as large as the label,
/// so every pair is usable as supervised training data.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPair {
    tile: TileAddress,
    label: TileMatrix,
    pixels: RasterPixels,
}

impl TrainingPair {
    pub fn new(
        tile: TileAddress,
        label: TileMatrix,
        pixels: RasterPixels,
    ) -> Result<Self, RoadTilesError> {
        if pixels.width() != label.size() || pixels.height() != label.size() {
            return Err(RoadTilesError::DimensionMismatch {
                tile,
                expected: label.size(),
                actual: (pixels.height(), pixels.width()),
            });
        }
        Ok(Self {
            tile,
            label,
            pixels,
        })
    }

    pub fn tile(&self) -> &TileAddress {
        &self.tile
    }

    pub fn label(&self) -> &TileMatrix {
        &self.label
    }

    pub fn pixels(&self) -> &RasterPixels {
        &self.pixels
    }
}
