//! Dataset Cleaning Library
//!
//! Automatic cleaning and exploratory chart data for uploaded CSV datasets,
//! built with Rust and Polars.
//!
//! # Overview
//!
//! One upload is one run:
//!
//! - **Loading**: the CSV is parsed, with the usual spreadsheet missing
//!   markers (`NA`, `N/A`, `NULL`, empty field, ...) read as missing
//! - **Classification**: every column becomes numeric or categorical
//! - **Imputation**: numeric gaps get the median when the column is skewed
//!   (|skewness| > 1) and the mean otherwise; categorical gaps get the
//!   most frequent value, first seen on ties
//! - **Outlier clipping**: every numeric column is clipped to
//!   `[Q1 - 1.5 * IQR, Q3 + 1.5 * IQR]`, with nearest-rank quartiles so
//!   cleaning a cleaned dataset changes nothing
//! - **Chart data**: histograms, box plots, a correlation matrix, bar
//!   charts and grouped box plots for a plotting layer
//!
//! The cleaned dataset is offered as `cleaned_data.csv`. A run either
//! succeeds completely or returns one [`ProcessingError`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use eda_processing::{CleaningConfig, Pipeline};
//!
//! let processed = Pipeline::builder()
//!     .config(CleaningConfig::default())
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process_file("data.csv")?;
//!
//! for record in &processed.summary.imputations {
//!     println!("{}: {} -> {}", record.column, record.strategy, record.fill_value);
//! }
//!
//! let path = processed.write_csv("outputs".as_ref())?;
//! println!("Cleaned data written to {}", path.display());
//! ```
//!
//! # Using the cleaner directly
//!
//! ```rust,ignore
//! use eda_processing::{Column, Dataset, DatasetCleaner};
//!
//! let dataset = Dataset::new(vec![
//!     Column::numeric("x", [Some(1.0), Some(2.0), Some(3.0), Some(100.0), None]),
//! ])?;
//!
//! let outcome = DatasetCleaner::default().clean(dataset)?;
//! // [1, 2, 3, 4.5, 2.5]
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use eda_processing::{CleaningConfig, EmptyColumnPolicy};
//!
//! let config = CleaningConfig::builder()
//!     .skew_threshold(1.0)
//!     .iqr_multiplier(1.5)
//!     .empty_column_policy(EmptyColumnPolicy::Keep)
//!     .histogram_bins(20)
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod dataset;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod visuals;

// Re-exports for convenient access
pub use cleaner::{CleaningOutcome, CleaningPass, DatasetCleaner, OutlierHandler, PassEvent};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, DEFAULT_OUTPUT_FILE_NAME,
    EmptyColumnPolicy, QuartileMethod,
};
pub use dataset::{Column, ColumnData, ColumnKind, Dataset, DatasetPreview, NumericValues};
pub use error::{ProcessingError, Result as ProcessingResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, ProcessedDataset, ProcessingStage,
    ProgressReporter, ProgressUpdate,
};
pub use profiler::DataProfiler;
pub use reporting::{CleaningReport, ReportGenerator};
pub use types::{
    CleaningSummary, ClippingRecord, ColumnProfile, DatasetProfile, FillValue, ImputationRecord,
    ImputationStrategy,
};
pub use visuals::VisualizationPlan;
