use crate::core::types::TileAddress;
use crate::io::fetch::TileFetcher;
use crate::util::error::RoadTilesError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk store of tile payloads laid out as `<root>/<z>/<y>/<x>.<format>`.
///
/// Paths are only ever derived from a [`TileAddress`].
/// Where a payload returned by [`TileCache::fetch_cached`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadOrigin {
    Cache,
    Network,
}

#[derive(Debug, Clone)]
pub struct TileCache {
    root: PathBuf,
    format: String,
}

impl TileCache {
    pub fn new(root: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            format: format.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, tile: &TileAddress) -> PathBuf {
        self.root
            .join(tile.z.to_string())
            .join(tile.y.to_string())
            .join(format!("{}.{}", tile.x, self.format))
    }

    pub fn contains(&self, tile: &TileAddress) -> bool {
        self.path_for(tile).is_file()
    }

    /// Returns the cached payload, or `None` if the tile was never stored.
    pub fn read(&self, tile: &TileAddress) -> Result<Option<Vec<u8>>, RoadTilesError> {
        let path = self.path_for(tile);
        if !path.is_file() {
            return Ok(None);
        }
        fs::read(&path)
            .map(Some)
            .map_err(|e| RoadTilesError::IoError(format!("{}: {}", path.display(), e)))
    }

    /// Stores a payload, creating the `z/y` directories as needed.
    pub fn write(&self, tile: &TileAddress, bytes: &[u8]) -> Result<PathBuf, RoadTilesError> {
        let path = self.path_for(tile);
        if let Some(dir) = path.parent() {
            // Existing directories are fine.
            fs::create_dir_all(dir)
                .map_err(|e| RoadTilesError::IoError(format!("{}: {}", dir.display(), e)))?;
        }
        fs::write(&path, bytes)
            .map_err(|e| RoadTilesError::IoError(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), bytes = bytes.len(), "cached tile");
        Ok(path)
    }

    /// Returns the cached payload of `tile`, or fetches `url` and stores it.
    pub fn fetch_cached<F: TileFetcher + ?Sized>(
        &self,
        tile: &TileAddress,
        url: &str,
        fetcher: &F,
    ) -> Result<(Vec<u8>, PayloadOrigin), RoadTilesError> {
        if let Some(bytes) = self.read(tile)? {
            return Ok((bytes, PayloadOrigin::Cache));
        }
        let bytes = fetcher.fetch(url)?;
        self.write(tile, &bytes)?;
        Ok((bytes, PayloadOrigin::Network))
    }
}
