//! Training pipeline for grid-world controllers

pub mod baselines;
pub mod observers;
pub mod training;

pub use baselines::{FrozenController, RandomController};
pub use observers::{JsonlObserver, MetricsObserver, ProgressObserver};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};
