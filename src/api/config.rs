use crate::core::constants::MAX_ZOOM_LEVEL;
use crate::core::types::{BoundingBox, Coordinate};
use crate::io::fetch::TileSource;
use crate::util::error::RoadTilesError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Region around Yosemite Village.
pub const DEFAULT_BOUNDING_BOX: BoundingBox = BoundingBox::new(
    Coordinate::new(37.81385, -119.48559),
    Coordinate::new(37.66724, -119.72454),
);

pub const DEFAULT_ZOOM_LEVEL: u8 = 12;

pub const DEFAULT_VECTOR_BASE_URL: &str = "http://vector.mapzen.com/osm/";
pub const DEFAULT_RASTER_BASE_URL: &str = "http://otile2.mqcdn.com/tiles/1.0.0/sat/";

/// Configuration for downloading tiles and building training data.
///
/// Missing fields in a JSON config fall back to the defaults.
///
/// # Example
/// ```
/// use roadtiles::PipelineConfig;
///
/// let config = PipelineConfig::default()
///     .zoom_level(14)
///     .vector_api_key("my-key")
///     .cache_dir("/tmp/roadtiles");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub bounding_box: BoundingBox,
    pub zoom_level: u8,
    pub vector_source: TileSource,
    pub raster_source: TileSource,
    /// Root of the payload cache; vector and raster tiles go in subdirectories.
    pub cache_dir: PathBuf,
    pub output_path: PathBuf,
    /// Extra attempts after a failed fetch.
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each further attempt.
    pub retry_backoff_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bounding_box: DEFAULT_BOUNDING_BOX,
            zoom_level: DEFAULT_ZOOM_LEVEL,
            vector_source: TileSource::new(DEFAULT_VECTOR_BASE_URL, "json").with_layers("roads"),
            raster_source: TileSource::new(DEFAULT_RASTER_BASE_URL, "jpg"),
            cache_dir: PathBuf::from("data"),
            output_path: PathBuf::from("data/training.parquet"),
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RoadTilesError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| RoadTilesError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| RoadTilesError::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RoadTilesError> {
        if self.zoom_level > MAX_ZOOM_LEVEL {
            return Err(RoadTilesError::InvalidZoomLevel(self.zoom_level));
        }
        if self.vector_source.base_url.is_empty() || self.raster_source.base_url.is_empty() {
            return Err(RoadTilesError::ConfigError(
                "Tile source base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    pub fn zoom_level(mut self, zoom_level: u8) -> Self {
        self.zoom_level = zoom_level;
        self
    }

    pub fn vector_source(mut self, source: TileSource) -> Self {
        self.vector_source = source;
        self
    }

    pub fn raster_source(mut self, source: TileSource) -> Self {
        self.raster_source = source;
        self
    }

    /// Sets the `?api_key=` suffix of the vector source.
    pub fn vector_api_key(mut self, key: &str) -> Self {
        self.vector_source.suffix = format!("?api_key={}", key);
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn retries(mut self, max_retries: u32, backoff_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = backoff_ms;
        self
    }

    pub fn vector_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("vector-tiles")
    }

    pub fn raster_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("raster-tiles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.zoom_level, 12);
        assert_eq!(config.bounding_box, DEFAULT_BOUNDING_BOX);
        assert_eq!(config.vector_source.layers.as_deref(), Some("roads"));
        assert_eq!(config.raster_source.format, "jpg");
        assert_eq!(config.vector_cache_dir(), PathBuf::from("data/vector-tiles"));
        assert_eq!(config.raster_cache_dir(), PathBuf::from("data/raster-tiles"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_setters() {
        let config = PipelineConfig::default()
            .zoom_level(15)
            .vector_api_key("abc")
            .cache_dir("/tmp/cache")
            .output_path("/tmp/out.parquet")
            .retries(0, 0);
        assert_eq!(config.zoom_level, 15);
        assert_eq!(config.vector_source.suffix, "?api_key=abc");
        assert_eq!(config.raster_cache_dir(), PathBuf::from("/tmp/cache/raster-tiles"));
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_invalid_zoom() {
        let config = PipelineConfig::default().zoom_level(30);
        assert_eq!(config.validate(), Err(RoadTilesError::InvalidZoomLevel(30)));
    }

    #[test]
    fn test_from_json_file_partial() -> Result<(), RoadTilesError> {
        let dir = tempdir().map_err(|e| RoadTilesError::IoError(e.to_string()))?;
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).map_err(|e| RoadTilesError::IoError(e.to_string()))?;
        write!(
            file,
            r#"{{"zoom_level": 13,
                "bounding_box": {{"northeast": {{"lat": 1.0, "lon": 2.0}},
                                  "southwest": {{"lat": -1.0, "lon": -2.0}}}}}}"#
        )
        .map_err(|e| RoadTilesError::IoError(e.to_string()))?;

        let config = PipelineConfig::from_json_file(&path)?;
        assert_eq!(config.zoom_level, 13);
        assert_eq!(config.bounding_box.northeast, Coordinate::new(1.0, 2.0));
        assert_eq!(config.raster_source, PipelineConfig::default().raster_source);
        Ok(())
    }

    #[test]
    fn test_from_json_file_errors() -> Result<(), RoadTilesError> {
        let dir = tempdir().map_err(|e| RoadTilesError::IoError(e.to_string()))?;

        let missing = PipelineConfig::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(RoadTilesError::ConfigError(_))));

        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").map_err(|e| RoadTilesError::IoError(e.to_string()))?;
        let bad = PipelineConfig::from_json_file(&path);
        assert!(matches!(bad, Err(RoadTilesError::ConfigError(_))));
        Ok(())
    }
}
