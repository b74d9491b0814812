use crate::api::config::PipelineConfig;
use crate::api::training::{self, TrainingPair};
use crate::core::tiles::TileGrid;
use crate::core::types::TileAddress;
use crate::io::cache::{PayloadOrigin, TileCache};
use crate::io::decode::decode_raster;
use crate::io::fetch::{HttpFetcher, RetryingFetcher, TileFetcher, TileSource};
use crate::io::writer::write_training_pairs;
use crate::raster::matrix::TileMatrix;
use crate::util::error::RoadTilesError;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of downloading one payload kind for every tile.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub downloaded: usize,
    pub cached: usize,
    pub failed: Vec<(TileAddress, RoadTilesError)>,
}

impl DownloadReport {
    pub fn total(&self) -> usize {
        self.downloaded + self.cached + self.failed.len()
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub tiles: usize,
    pub vectors: DownloadReport,
    pub rasters: DownloadReport,
    pub pairs: usize,
    pub output_path: PathBuf,
}

/// Downloads vector and raster tiles of a region and turns them into
/// training pairs.
///
/// Payloads are cached on disk, so every stage can be rerun without
/// refetching.
pub struct Pipeline<F: TileFetcher> {
    config: PipelineConfig,
    fetcher: RetryingFetcher<F>,
    vector_cache: TileCache,
    raster_cache: TileCache,
}

impl Pipeline<HttpFetcher> {
    pub fn with_http(config: PipelineConfig) -> Result<Self, RoadTilesError> {
        Self::new(config, HttpFetcher::new()?)
    }
}

impl<F: TileFetcher> Pipeline<F> {
    pub fn new(config: PipelineConfig, fetcher: F) -> Result<Self, RoadTilesError> {
        config.validate()?;

        let fetcher = RetryingFetcher::new(
            fetcher,
            config.max_retries,
            Duration::from_millis(config.retry_backoff_ms),
        );
        let vector_cache = TileCache::new(config.vector_cache_dir(), &config.vector_source.format);
        let raster_cache = TileCache::new(config.raster_cache_dir(), &config.raster_source.format);

        Ok(Self {
            config,
            fetcher,
            vector_cache,
            raster_cache,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        self.fetcher.inner()
    }

    pub fn vector_cache(&self) -> &TileCache {
        &self.vector_cache
    }

    pub fn raster_cache(&self) -> &TileCache {
        &self.raster_cache
    }

    pub fn tiles(&self) -> Result<TileGrid, RoadTilesError> {
        TileGrid::from_bounding_box(&self.config.bounding_box, self.config.zoom_level)
    }

    pub fn download_vectors(&self) -> Result<DownloadReport, RoadTilesError> {
        self.download(&self.config.vector_source, &self.vector_cache, "vector")
    }

    pub fn download_rasters(&self) -> Result<DownloadReport, RoadTilesError> {
        self.download(&self.config.raster_source, &self.raster_cache, "raster")
    }

    fn download(
        &self,
        source: &TileSource,
        cache: &TileCache,
        kind: &str,
    ) -> Result<DownloadReport, RoadTilesError> {
        let grid = self.tiles()?;

        let outcomes: Vec<_> = grid
            .tiles()
            .par_iter()
            .map(|tile| {
                let url = source.url_for(tile);
                (*tile, cache.fetch_cached(tile, &url, &self.fetcher))
            })
            .collect();

        let mut report = DownloadReport::default();
        for (tile, outcome) in outcomes {
            match outcome {
                Ok((_, PayloadOrigin::Cache)) => report.cached += 1,
                Ok((_, PayloadOrigin::Network)) => report.downloaded += 1,
                Err(e) => {
                    warn!(%tile, error = %e, "{} tile download failed", kind);
                    report.failed.push((tile, e));
                }
            }
        }

        info!(
            downloaded = report.downloaded,
            cached = report.cached,
            failed = report.failed.len(),
            "{} tiles ready",
            kind
        );
        Ok(report)
    }

    /// Labels a tile from its cached vector payload.
    pub fn label_cached_tile(&self, tile: &TileAddress) -> Result<TileMatrix, RoadTilesError> {
        let bytes = self.vector_cache.read(tile)?.ok_or_else(|| {
            RoadTilesError::IoError(format!("No cached vector tile for {}", tile))
        })?;
        let geojson = String::from_utf8(bytes)
            .map_err(|e| RoadTilesError::GeoJsonParseError(e.to_string()))?;
        self.label_tile(tile, &geojson)
    }

    pub fn label_tile(&self, tile: &TileAddress, geojson: &str) -> Result<TileMatrix, RoadTilesError> {
        training::label_tile(tile, geojson)
    }

    /// Builds the training pair of one tile from its cached payloads.
    pub fn pair_for_tile(&self, tile: &TileAddress) -> Result<TrainingPair, RoadTilesError> {
        let label = self.label_cached_tile(tile)?;
        let bytes = self.raster_cache.read(tile)?.ok_or_else(|| {
            RoadTilesError::IoError(format!("No cached raster tile for {}", tile))
        })?;
        let pixels = decode_raster(&bytes)?;
        TrainingPair::new(*tile, label, pixels)
    }

    /// Builds a pair for every tile with both payloads cached, in grid order.
    ///
    /// Tiles that cannot be paired are skipped.
    pub fn build_training_pairs(&self) -> Result<Vec<TrainingPair>, RoadTilesError> {
        let grid = self.tiles()?;

        let pairs: Vec<TrainingPair> = grid
            .tiles()
            .par_iter()
            .filter_map(|tile| match self.pair_for_tile(tile) {
                Ok(pair) => Some(pair),
                Err(e) => {
                    warn!(%tile, error = %e, "skipping tile");
                    None
                }
            })
            .collect();

        info!(pairs = pairs.len(), tiles = grid.len(), "built training pairs");
        Ok(pairs)
    }

    /// Builds every pair and writes them to the configured output file.
    pub fn process(&self) -> Result<Vec<TrainingPair>, RoadTilesError> {
        let pairs = self.build_training_pairs()?;
        write_training_pairs(&pairs, &self.config.output_path)?;
        Ok(pairs)
    }

    pub fn run(&self) -> Result<RunSummary, RoadTilesError> {
        let tiles = self.tiles()?.len();
        info!(tiles, zoom = self.config.zoom_level, "starting run");

        let vectors = self.download_vectors()?;
        let rasters = self.download_rasters()?;
        let pairs = self.process()?.len();

        Ok(RunSummary {
            tiles,
            vectors,
            rasters,
            pairs,
            output_path: self.config.output_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BoundingBox, Coordinate};
    use crate::io::decode::tests::png_bytes;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    const ROAD: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"kind":"major_road"},
         "geometry":{"type":"LineString","coordinates":[[-119.69,37.77],[-119.64,37.73]]}}
    ]}"#;

    /// In-memory tile server; unknown urls fail like a 404.
    #[derive(Default)]
    struct FakeFetcher {
        responses: HashMap<String, Vec<u8>>,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl FakeFetcher {
        fn serve(&mut self, url: String, bytes: Vec<u8>) {
            self.responses.insert(url, bytes);
        }

        fn calls(&self, url: &str) -> usize {
            self.calls
                .lock()
                .map(|c| c.get(url).copied().unwrap_or(0))
                .unwrap_or(0)
        }
    }

    impl TileFetcher for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, RoadTilesError> {
            if let Ok(mut calls) = self.calls.lock() {
                *calls.entry(url.to_string()).or_insert(0) += 1;
            }
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| RoadTilesError::Fetch {
                    url: url.to_string(),
                    reason: "HTTP 404 Not Found".to_string(),
                })
        }
    }

    /// Two horizontally adjacent zoom-12 tiles: (686, 1583) and (687, 1583).
    fn test_config(dir: &TempDir) -> PipelineConfig {
        PipelineConfig::default()
            .bounding_box(BoundingBox::new(
                Coordinate::new(37.75, -119.50),
                Coordinate::new(37.70, -119.69),
            ))
            .zoom_level(12)
            .vector_source(TileSource::new("http://vector.test/", "json").with_layers("roads"))
            .raster_source(TileSource::new("http://raster.test/", "png"))
            .cache_dir(dir.path().join("cache"))
            .output_path(dir.path().join("out").join("training.parquet"))
            .retries(1, 0)
    }

    fn serve_all(fetcher: &mut FakeFetcher, config: &PipelineConfig) -> Result<(), RoadTilesError> {
        for tile in TileGrid::from_bounding_box(&config.bounding_box, config.zoom_level)?.iter() {
            fetcher.serve(config.vector_source.url_for(tile), ROAD.as_bytes().to_vec());
            fetcher.serve(config.raster_source.url_for(tile), png_bytes(256, 256, [10, 20, 30]));
        }
        Ok(())
    }

    #[test]
    fn test_tiles_follow_config() -> Result<(), RoadTilesError> {
        let dir = tempdir().map_err(|e| RoadTilesError::IoError(e.to_string()))?;
        let pipeline = Pipeline::new(test_config(&dir), FakeFetcher::default())?;

        let grid = pipeline.tiles()?;
        assert_eq!(
            grid.tiles(),
            &[TileAddress::new(686, 1583, 12), TileAddress::new(687, 1583, 12)]
        );
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PipelineConfig::default().zoom_level(40);
        let result = Pipeline::new(config, FakeFetcher::default());
        assert!(matches!(result, Err(RoadTilesError::InvalidZoomLevel(40))));
    }

    #[test]
    fn test_download_uses_cache_on_second_run() -> Result<(), RoadTilesError> {
        let dir = tempdir().map_err(|e| RoadTilesError::IoError(e.to_string()))?;
        let config = test_config(&dir);
        let mut fetcher = FakeFetcher::default();
        serve_all(&mut fetcher, &config)?;
        let pipeline = Pipeline::new(config, fetcher)?;

        let first = pipeline.download_vectors()?;
        assert_eq!((first.downloaded, first.cached), (2, 0));
        assert!(first.failed.is_empty());

        let second = pipeline.download_vectors()?;
        assert_eq!((second.downloaded, second.cached), (0, 2));

        let url = pipeline
            .config()
            .vector_source
            .url_for(&TileAddress::new(686, 1583, 12));
        assert_eq!(pipeline.fetcher().calls(&url), 1);
        assert!(
            pipeline
                .vector_cache()
                .contains(&TileAddress::new(687, 1583, 12))
        );
        Ok(())
    }

    #[test]
    fn test_download_collects_failures() -> Result<(), RoadTilesError> {
        let dir = tempdir().map_err(|e| RoadTilesError::IoError(e.to_string()))?;
        let config = test_config(&dir);
        let mut fetcher = FakeFetcher::default();
        let served = TileAddress::new(686, 1583, 12);
        fetcher.serve(config.raster_source.url_for(&served), png_bytes(256, 256, [0, 0, 0]));
        let pipeline = Pipeline::new(config, fetcher)?;

        let report = pipeline.download_rasters()?;
        assert_eq!(report.downloaded, 1);
        assert_eq!(report.total(), 2);
        assert_eq!(report.failed.len(), 1);

        let (tile, error) = &report.failed[0];
        assert_eq!(tile, &TileAddress::new(687, 1583, 12));
        assert!(error.is_transient());

        // One retry after the first failure.
        let url = pipeline.config().raster_source.url_for(tile);
        assert_eq!(pipeline.fetcher().calls(&url), 2);
        Ok(())
    }

    #[test]
    fn test_label_tile_marks_only_its_own_tile() -> Result<(), RoadTilesError> {
        let dir = tempdir().map_err(|e| RoadTilesError::IoError(e.to_string()))?;
        let pipeline = Pipeline::new(test_config(&dir), FakeFetcher::default())?;

        let inside = pipeline.label_tile(&TileAddress::new(686, 1583, 12), ROAD)?;
        let outside = pipeline.label_tile(&TileAddress::new(687, 1583, 12), ROAD)?;
        assert!(inside.count_set() > 0);
        assert_eq!(outside.count_set(), 0);
        Ok(())
    }

    #[test]
    fn test_build_pairs_skips_incomplete_tiles() -> Result<(), RoadTilesError> {
        let dir = tempdir().map_err(|e| RoadTilesError::IoError(e.to_string()))?;
        let config = test_config(&dir);
        let mut fetcher = FakeFetcher::default();
        serve_all(&mut fetcher, &config)?;
        // Wrong raster size for the second tile.
        fetcher.serve(
            config.raster_source.url_for(&TileAddress::new(687, 1583, 12)),
            png_bytes(128, 128, [0, 0, 0]),
        );
        let pipeline = Pipeline::new(config, fetcher)?;

        assert!(pipeline.build_training_pairs()?.is_empty());

        pipeline.download_vectors()?;
        pipeline.download_rasters()?;
        let pairs = pipeline.build_training_pairs()?;

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].tile(), &TileAddress::new(686, 1583, 12));
        assert!(pairs[0].label().count_set() > 0);
        assert_eq!(pairs[0].pixels().pixel(10, 10), Some([10, 20, 30]));

        let mismatch = pipeline.pair_for_tile(&TileAddress::new(687, 1583, 12));
        assert!(matches!(mismatch, Err(RoadTilesError::DimensionMismatch { .. })));
        Ok(())
    }

    #[test]
    fn test_run_writes_output() -> Result<(), RoadTilesError> {
        let dir = tempdir().map_err(|e| RoadTilesError::IoError(e.to_string()))?;
        let config = test_config(&dir);
        let mut fetcher = FakeFetcher::default();
        serve_all(&mut fetcher, &config)?;
        let pipeline = Pipeline::new(config, fetcher)?;

        let summary = pipeline.run()?;
        assert_eq!(summary.tiles, 2);
        assert_eq!(summary.vectors.downloaded, 2);
        assert_eq!(summary.rasters.downloaded, 2);
        assert_eq!(summary.pairs, 2);
        assert!(summary.output_path.exists());
        Ok(())
    }
}
