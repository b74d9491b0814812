use crate::api::training::TrainingPair;
use crate::util::error::RoadTilesError;
use arrow_array::{Int64Array, LargeBinaryArray, RecordBatch, UInt8Array, UInt32Array};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

/// Schema of the training table: one row per tile.
///
/// `label` holds `size * size` row-major 0/1 bytes and `pixels` holds
/// `size * size * 3` row-major RGB bytes.
pub fn training_schema() -> Schema {
    Schema::new(vec![
        Field::new("z", DataType::UInt8, false),
        Field::new("x", DataType::Int64, false),
        Field::new("y", DataType::Int64, false),
        Field::new("size", DataType::UInt32, false),
        Field::new("label", DataType::LargeBinary, false),
        Field::new("pixels", DataType::LargeBinary, false),
    ])
}

/// Trait for converting collections of [`TrainingPair`]s to Arrow.
///
/// Implemented for `[TrainingPair]` and `Vec<TrainingPair>`.
pub trait TrainingPairsToArrow {
    fn to_record_batch(&self) -> Result<RecordBatch, RoadTilesError>;
}

impl TrainingPairsToArrow for [TrainingPair] {
    fn to_record_batch(&self) -> Result<RecordBatch, RoadTilesError> {
        let zs: UInt8Array = self.iter().map(|p| Some(p.tile().z)).collect();
        let xs: Int64Array = self.iter().map(|p| Some(p.tile().x)).collect();
        let ys: Int64Array = self.iter().map(|p| Some(p.tile().y)).collect();
        let sizes: UInt32Array = self.iter().map(|p| Some(p.label().size() as u32)).collect();
        let labels = LargeBinaryArray::from_iter_values(self.iter().map(|p| p.label().as_slice()));
        let pixels =
            LargeBinaryArray::from_iter_values(self.iter().map(|p| p.pixels().as_slice()));

        RecordBatch::try_new(
            Arc::new(training_schema()),
            vec![
                Arc::new(zs),
                Arc::new(xs),
                Arc::new(ys),
                Arc::new(sizes),
                Arc::new(labels),
                Arc::new(pixels),
            ],
        )
        .map_err(|e| RoadTilesError::IoError(e.to_string()))
    }
}

impl TrainingPairsToArrow for Vec<TrainingPair> {
    fn to_record_batch(&self) -> Result<RecordBatch, RoadTilesError> {
        self.as_slice().to_record_batch()
    }
}
