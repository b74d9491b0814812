use crate::api::training::TrainingPair;
use crate::io::arrow::TrainingPairsToArrow;
use crate::util::error::RoadTilesError;
use arrow_array::RecordBatch;
use parquet::arrow::ArrowWriter;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// Writes a record batch to a Parquet file, creating parent directories.
pub fn write_parquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), RoadTilesError> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| RoadTilesError::IoError(e.to_string()))?;
    }

    let file = File::create(path).map_err(|e| RoadTilesError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .map_err(|e| RoadTilesError::IoError(e.to_string()))?;

    writer
        .write(batch)
        .map_err(|e| RoadTilesError::IoError(e.to_string()))?;
    writer
        .close()
        .map_err(|e| RoadTilesError::IoError(e.to_string()))?;

    info!(path = %path.display(), rows = batch.num_rows(), "wrote training data");
    Ok(())
}

/// Writes training pairs to a Parquet file with [`training_schema`](crate::io::training_schema).
pub fn write_training_pairs(
    pairs: &[TrainingPair],
    path: impl AsRef<Path>,
) -> Result<(), RoadTilesError> {
    let batch = pairs.to_record_batch()?;
    write_parquet(&batch, path)
}

pub trait TrainingPairsToParquet: TrainingPairsToArrow {
    fn to_parquet(&self, path: impl AsRef<Path>) -> Result<(), RoadTilesError>;
}

impl TrainingPairsToParquet for [TrainingPair] {
    fn to_parquet(&self, path: impl AsRef<Path>) -> Result<(), RoadTilesError> {
        write_training_pairs(self, path)
    }
}

impl TrainingPairsToParquet for Vec<TrainingPair> {
    fn to_parquet(&self, path: impl AsRef<Path>) -> Result<(), RoadTilesError> {
        self.as_slice().to_parquet(path)
    }
}
