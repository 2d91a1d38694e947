//! Pipeline module.
//!
//! This module provides the cleaning pipeline and related components.

mod builder;
mod processed;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use processed::ProcessedDataset;
pub use progress::{ClosureProgressReporter, ProcessingStage, ProgressReporter, ProgressUpdate};
