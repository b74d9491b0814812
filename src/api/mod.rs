pub mod config;
pub mod pipeline;
pub mod training;

pub use config::PipelineConfig;
pub use pipeline::{DownloadReport, Pipeline, RunSummary};
pub use training::{TrainingPair, label_tile};
