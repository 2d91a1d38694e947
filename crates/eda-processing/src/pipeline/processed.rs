//! Result of one pipeline run.

use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

use crate::config::CleaningConfig;
use crate::dataset::{Dataset, DatasetPreview};
use crate::error::Result;
use crate::io;
use crate::types::CleaningSummary;
use crate::visuals::VisualizationPlan;

/// A cleaned upload: the dataset, what was done to it, and its chart data.
#[derive(Debug, Clone)]
pub struct ProcessedDataset {
    pub dataset: Dataset,
    pub summary: CleaningSummary,
    pub visuals: VisualizationPlan,
    pub(crate) config: CleaningConfig,
}

impl ProcessedDataset {
    /// First rows of the cleaned dataset.
    pub fn preview(&self) -> DatasetPreview {
        self.dataset.preview(self.config.preview_rows)
    }

    /// The cleaned dataset as a polars frame.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        self.dataset.to_dataframe()
    }

    /// The cleaned dataset as CSV text, ready to offer for download.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        io::to_csv_bytes(&self.dataset)
    }

    /// Name of the download file.
    pub fn file_name(&self) -> &str {
        &self.config.output_file_name
    }

    /// Write the cleaned CSV into `dir` under [`file_name`](Self::file_name).
    pub fn write_csv(&self, dir: &Path) -> Result<PathBuf> {
        io::write_csv(&self.dataset, dir, &self.config.output_file_name)
    }
}
