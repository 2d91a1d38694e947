//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling datasets, including:
//! - Classification of polars columns into numeric and categorical
//! - Descriptive statistics shared by the cleaner and the chart builders
//! - A per-column profile used for dry runs

pub mod statistics;
mod type_inference;

use tracing::debug;

use crate::config::CleaningConfig;
use crate::dataset::{ColumnData, Dataset};
use crate::imputers::StatisticalImputer;
use crate::types::{ColumnProfile, DatasetProfile, ImputationStrategy};

pub(crate) use type_inference::classify_column;
pub use type_inference::{classify_dtype, is_integer_dtype, is_numeric_dtype};

/// Data profiler for analyzing dataset structure and characteristics.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile an entire dataset without modifying it.
    ///
    /// Reports per-column missingness, cardinality, skewness and the
    /// imputation strategy the cleaner would pick under `config`.
    pub fn profile_dataset(dataset: &Dataset, config: &CleaningConfig) -> DatasetProfile {
        let column_profiles: Vec<ColumnProfile> = dataset
            .columns()
            .iter()
            .map(|column| {
                let null_count = column.missing_count();
                let null_percentage = if column.is_empty() {
                    0.0
                } else {
                    (null_count as f64 / column.len() as f64) * 100.0
                };

                let (skewness, strategy) = match column.data() {
                    ColumnData::Numeric(values) => {
                        let skew = statistics::skewness(&values.present());
                        (
                            skew,
                            StatisticalImputer::numeric_strategy(skew, config.skew_threshold),
                        )
                    }
                    ColumnData::Categorical(_) => (None, ImputationStrategy::Mode),
                };

                // nothing to fill, or nothing to fill from
                let planned_imputation = (null_count > 0 && !column.is_fully_missing())
                    .then_some(strategy);

                debug!(
                    "Profiled '{}': kind={}, nulls={}, skew={:?}",
                    column.name(),
                    column.kind(),
                    null_count,
                    skewness
                );

                ColumnProfile {
                    name: column.name().to_string(),
                    kind: column.kind(),
                    null_count,
                    null_percentage,
                    unique_count: column.unique_count(),
                    skewness,
                    planned_imputation,
                }
            })
            .collect();

        DatasetProfile {
            shape: dataset.shape(),
            column_profiles,
            missing_cells: dataset.missing_count(),
        }
    }
}
