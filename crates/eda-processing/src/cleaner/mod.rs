//! Data cleaning module.
//!
//! This module provides the two cleaning passes:
//! - Missing-value imputation (skew-aware mean/median, first mode)
//! - Outlier clipping of numeric columns at the IQR fences
//!
//! The cleaner consumes its input. On error the dataset is dropped, so a
//! caller never sees a partially cleaned dataset.

mod outliers;

pub use outliers::OutlierHandler;

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{CleaningConfig, EmptyColumnPolicy};
use crate::dataset::Dataset;
use crate::error::{ProcessingError, Result};
use crate::imputers::StatisticalImputer;
use crate::types::CleaningSummary;

/// A cleaned dataset together with a record of what was done to it.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub dataset: Dataset,
    pub summary: CleaningSummary,
}

/// The two passes of a cleaning run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningPass {
    Imputation,
    OutlierClipping,
}

/// Reported to the observer of [`DatasetCleaner::clean_with_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassEvent {
    Started(CleaningPass),
    Finished(CleaningPass),
}

/// Data cleaner for automatic dataset cleaning operations.
#[derive(Debug, Clone, Default)]
pub struct DatasetCleaner {
    config: CleaningConfig,
}

impl DatasetCleaner {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a dataset.
    ///
    /// 1. Fill missing values of every column that has any
    /// 2. Clip every numeric column to its IQR fences
    ///
    /// The shape and column order of the dataset are unchanged.
    pub fn clean(&self, dataset: Dataset) -> Result<CleaningOutcome> {
        self.clean_with_progress(dataset, |_, _| {})
    }

    /// Clean a dataset, calling `observe` before and after each pass with
    /// the summary so far.
    pub fn clean_with_progress<F>(&self, dataset: Dataset, mut observe: F) -> Result<CleaningOutcome>
    where
        F: FnMut(PassEvent, &CleaningSummary),
    {
        let start = Instant::now();
        let mut dataset = dataset;
        let mut summary = CleaningSummary::new();

        summary.rows = dataset.height();
        summary.columns = dataset.width();
        summary.missing_before = dataset.missing_count();

        info!(
            "Cleaning dataset: {} rows x {} columns, {} missing cells",
            summary.rows, summary.columns, summary.missing_before
        );

        observe(PassEvent::Started(CleaningPass::Imputation), &summary);
        self.impute_missing(&mut dataset, &mut summary)?;
        observe(PassEvent::Finished(CleaningPass::Imputation), &summary);

        observe(PassEvent::Started(CleaningPass::OutlierClipping), &summary);
        self.clip_outliers(&mut dataset, &mut summary);
        observe(PassEvent::Finished(CleaningPass::OutlierClipping), &summary);

        summary.missing_after = dataset.missing_count();
        summary.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Cleaning complete: {} values imputed, {} values clipped in {}ms",
            summary.values_imputed(),
            summary.values_clipped(),
            summary.duration_ms
        );

        Ok(CleaningOutcome { dataset, summary })
    }

    /// Pass 1: fill the gaps of every column that has any.
    ///
    /// A fully-missing column is handled per [`EmptyColumnPolicy`]. On
    /// error the dataset may be partly imputed and must be discarded.
    fn impute_missing(&self, dataset: &mut Dataset, summary: &mut CleaningSummary) -> Result<()> {
        for column in dataset.columns_mut() {
            if column.is_fully_missing() {
                match self.config.empty_column_policy {
                    EmptyColumnPolicy::Fail => {
                        return Err(ProcessingError::NoValidValues(column.name().to_string())
                            .with_context("Imputing missing values"));
                    }
                    EmptyColumnPolicy::Keep => {
                        warn!("Column '{}' has no values; left unchanged", column.name());
                        summary.add_warning(format!(
                            "Column '{}' has no values and was left unchanged",
                            column.name()
                        ));
                        continue;
                    }
                }
            }

            if let Some(record) = StatisticalImputer::impute_column(column, self.config.skew_threshold)? {
                debug!(
                    "Imputed {} values in '{}' with {} ({})",
                    record.filled, record.column, record.strategy, record.fill_value
                );
                summary.add_step(format!(
                    "Filled {} missing values in '{}' with {}: {}",
                    record.filled, record.column, record.strategy, record.fill_value
                ));
                summary.imputations.push(record);
            }
        }
        Ok(())
    }

    /// Pass 2: clip every numeric column that has values.
    fn clip_outliers(&self, dataset: &mut Dataset, summary: &mut CleaningSummary) {
        let multiplier = self.config.iqr_multiplier;
        let method = self.config.quartile_method;
        for column in dataset.columns_mut() {
            if let Some(record) = OutlierHandler::clip_column(column, multiplier, method) {
                if record.total_clipped() > 0 {
                    summary.add_step(format!(
                        "Clipped {} values in '{}' to [{:.4}, {:.4}]",
                        record.total_clipped(),
                        record.column,
                        record.lower_bound,
                        record.upper_bound
                    ));
                }
                summary.clipping.push(record);
            }
        }
    }
}
