use crate::core::types::TileAddress;

/// Error type for roadtiles operations.
#[derive(Debug, PartialEq)]
pub enum RoadTilesError {
    /// The zoom level is outside the supported range (0-24).
    InvalidZoomLevel(u8),
    /// Fetching a tile payload failed. This is the only transient kind;
    /// callers may retry it.
    Fetch { url: String, reason: String },
    /// The vector payload is not a GeoJSON FeatureCollection.
    GeoJsonParseError(String),
    /// The raster payload could not be decoded into pixels.
    ImageDecodeError(String),
    /// A label matrix and its raster pixels do not have the same dimensions.
    DimensionMismatch {
        tile: TileAddress,
        expected: usize,
        actual: (usize, usize),
    },
    /// File I/O or serialization error.
    IoError(String),
    /// The pipeline configuration could not be read or is invalid.
    ConfigError(String),
}

impl RoadTilesError {
    /// Returns `true` for failures that a caller may retry with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, RoadTilesError::Fetch { .. })
    }
}

impl std::fmt::Display for RoadTilesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoadTilesError::InvalidZoomLevel(z) => write!(f, "Invalid zoom level: {}", z),
            RoadTilesError::Fetch { url, reason } => {
                write!(f, "Fetch of {} failed: {}", url, reason)
            }
            RoadTilesError::GeoJsonParseError(msg) => write!(f, "GeoJSON parse error: {}", msg),
            RoadTilesError::ImageDecodeError(msg) => write!(f, "Image decode error: {}", msg),
            RoadTilesError::DimensionMismatch {
                tile,
                expected,
                actual,
            } => write!(
                f,
                "Dimension mismatch for tile {}: label is {}x{}, raster is {}x{}",
                tile, expected, expected, actual.0, actual.1
            ),
            RoadTilesError::IoError(msg) => write!(f, "IO error: {}", msg),
            RoadTilesError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for RoadTilesError {}
