//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder. One call
//! to a `process*` method is one upload: parse, classify, clean, build
//! chart data. The run either returns a complete [`ProcessedDataset`] or
//! a single error.

use polars::prelude::DataFrame;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::cleaner::{CleaningOutcome, CleaningPass, DatasetCleaner, PassEvent};
use crate::config::{CleaningConfig, ConfigValidationError};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::io;
use crate::pipeline::processed::ProcessedDataset;
use crate::pipeline::progress::{
    ClosureProgressReporter, ProcessingStage, ProgressReporter, ProgressUpdate,
};
use crate::visuals::VisualizationPlan;

/// The main cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use eda_processing::{CleaningConfig, Pipeline};
///
/// let processed = Pipeline::builder()
///     .config(CleaningConfig::default())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process_file("data.csv")?;
///
/// processed.write_csv("outputs".as_ref())?;
/// ```
pub struct Pipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DatasetCleaner,
}

// Ensure Pipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Read, clean and chart a CSV file.
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<ProcessedDataset> {
        let path = path.as_ref();
        self.run(&path.display().to_string(), || {
            io::read_csv_file(path, &self.config)
        })
    }

    /// Read, clean and chart the raw bytes of an uploaded CSV.
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<ProcessedDataset> {
        self.run("upload", || io::read_csv_bytes(bytes, &self.config))
    }

    /// Clean and chart an already parsed frame.
    pub fn process(&self, df: DataFrame) -> Result<ProcessedDataset> {
        self.run("dataframe", || Ok(df))
    }

    fn run<F>(&self, source: &str, load: F) -> Result<ProcessedDataset>
    where
        F: FnOnce() -> Result<DataFrame>,
    {
        match self.process_internal(source, load) {
            Ok(processed) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(processed)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal<F>(&self, source: &str, load: F) -> Result<ProcessedDataset>
    where
        F: FnOnce() -> Result<DataFrame>,
    {
        let start_time = Instant::now();

        // Step 1: Load
        self.report_progress(ProgressUpdate::with_sub_stage(
            ProcessingStage::Loading,
            source,
            0.0,
            format!("Loading {}...", source),
        ));
        info!("Step 1: Loading {}...", source);

        let df = load()?;
        debug!("Loaded shape: {:?}", df.shape());

        self.report_progress(ProgressUpdate::with_sub_stage(
            ProcessingStage::Loading,
            source,
            1.0,
            format!("Loaded {} rows x {} columns", df.height(), df.width()),
        ));

        // Step 2: Classify
        self.report_progress(ProgressUpdate::new(
            ProcessingStage::Classifying,
            0.0,
            "Classifying columns...",
        ));
        info!("Step 2: Classifying columns...");

        let dataset = Dataset::from_dataframe(&df)?;
        drop(df);

        for column in dataset.columns() {
            debug!("  {}: {}", column.name(), column.kind());
        }
        self.report_progress(ProgressUpdate::new(
            ProcessingStage::Classifying,
            1.0,
            format!(
                "{} numeric, {} categorical columns",
                dataset.numeric_column_names().len(),
                dataset.categorical_column_names().len()
            ),
        ));

        // Steps 3 and 4: impute, then clip
        let CleaningOutcome { dataset, mut summary } =
            self.cleaner.clean_with_progress(dataset, |event, summary| {
                let update = match event {
                    PassEvent::Started(CleaningPass::Imputation) => {
                        info!("Step 3: Imputing missing values...");
                        ProgressUpdate::new(
                            ProcessingStage::Imputation,
                            0.0,
                            format!("Filling {} missing values...", summary.missing_before),
                        )
                    }
                    PassEvent::Finished(CleaningPass::Imputation) => ProgressUpdate::new(
                        ProcessingStage::Imputation,
                        1.0,
                        format!("Imputed {} columns", summary.imputations.len()),
                    ),
                    PassEvent::Started(CleaningPass::OutlierClipping) => {
                        info!("Step 4: Clipping outliers...");
                        ProgressUpdate::new(
                            ProcessingStage::OutlierHandling,
                            0.0,
                            "Clipping outliers...",
                        )
                    }
                    PassEvent::Finished(CleaningPass::OutlierClipping) => ProgressUpdate::new(
                        ProcessingStage::OutlierHandling,
                        1.0,
                        format!("Clipped {} values", summary.values_clipped()),
                    ),
                };
                self.report_progress(update);
            })?;

        // Step 5: Chart data
        self.report_progress(ProgressUpdate::new(
            ProcessingStage::Visualization,
            0.0,
            "Building chart data...",
        ));
        info!("Step 5: Building chart data...");

        let visuals = VisualizationPlan::build(&dataset, self.config.histogram_bins);

        self.report_progress(ProgressUpdate::new(
            ProcessingStage::Visualization,
            1.0,
            format!("Built {} charts", visuals.chart_count()),
        ));

        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Processed {} rows x {} columns in {}ms",
            summary.rows, summary.columns, summary.duration_ms
        );

        Ok(ProcessedDataset {
            dataset,
            summary,
            visuals,
            config: self.config.clone(),
        })
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure PipelineBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the cleaning configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use eda_processing::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct MyReporter;
    ///
    /// impl ProgressReporter for MyReporter {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         println!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = Pipeline::builder()
    ///     .progress_reporter(Arc::new(MyReporter))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            cleaner: DatasetCleaner::new(config.clone()),
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
