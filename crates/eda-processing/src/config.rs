//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! The defaults reproduce the fixed cleaning behaviour: skew threshold 1.0,
//! IQR multiplier 1.5, fail on fully-missing columns.

use serde::{Deserialize, Serialize};

pub use crate::profiler::statistics::QuartileMethod;

/// Default file name of the cleaned CSV offered for download.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "cleaned_data.csv";

/// Tokens read as missing values when parsing CSV input.
pub const DEFAULT_MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// What to do with a column whose values are all missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EmptyColumnPolicy {
    /// Abort the run with a processing failure.
    #[default]
    Fail,
    /// Leave the column untouched and record a warning.
    Keep,
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to create a configuration with a
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use eda_processing::config::{CleaningConfig, EmptyColumnPolicy};
///
/// let config = CleaningConfig::builder()
///     .empty_column_policy(EmptyColumnPolicy::Keep)
///     .histogram_bins(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Absolute skewness above which numeric gaps are filled with the
    /// median instead of the mean.
    /// Default: 1.0
    pub skew_threshold: f64,

    /// Multiplier applied to the IQR to derive the clipping bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Quartile rule behind the clipping bounds.
    /// Default: NearestRank
    #[serde(default)]
    pub quartile_method: QuartileMethod,

    /// Handling of fully-missing columns.
    /// Default: Fail
    pub empty_column_policy: EmptyColumnPolicy,

    /// Field values read as missing, in addition to empty fields.
    pub missing_markers: Vec<String>,

    /// Rows sampled by the CSV reader for schema inference.
    /// `None` scans the whole file. A file that does not parse with the
    /// sampled schema is read again with a full scan.
    /// Default: Some(1000)
    pub infer_schema_length: Option<usize>,

    /// Number of equal-width bins per histogram.
    /// Default: 10
    pub histogram_bins: usize,

    /// Number of rows in the cleaned data preview.
    /// Default: 5
    pub preview_rows: usize,

    /// File name of the cleaned CSV.
    /// Default: "cleaned_data.csv"
    pub output_file_name: String,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            skew_threshold: 1.0,
            iqr_multiplier: 1.5,
            quartile_method: QuartileMethod::default(),
            empty_column_policy: EmptyColumnPolicy::default(),
            missing_markers: default_missing_markers(),
            infer_schema_length: Some(1000),
            histogram_bins: 10,
            preview_rows: 5,
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
        }
    }
}

fn default_missing_markers() -> Vec<String> {
    DEFAULT_MISSING_MARKERS.iter().map(|s| s.to_string()).collect()
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.skew_threshold.is_finite() || self.skew_threshold < 0.0 {
            return Err(ConfigValidationError::InvalidSkewThreshold(
                self.skew_threshold,
            ));
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidHistogramBins(
                self.histogram_bins,
            ));
        }

        if self.output_file_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyOutputFileName);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid skew threshold: {0} (must be a finite value >= 0.0)")]
    InvalidSkewThreshold(f64),

    #[error("Invalid IQR multiplier: {0} (must be a finite value >= 0.0)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidHistogramBins(usize),

    #[error("Output file name must not be empty")]
    EmptyOutputFileName,
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    skew_threshold: Option<f64>,
    iqr_multiplier: Option<f64>,
    quartile_method: Option<QuartileMethod>,
    empty_column_policy: Option<EmptyColumnPolicy>,
    missing_markers: Option<Vec<String>>,
    infer_schema_length: Option<Option<usize>>,
    histogram_bins: Option<usize>,
    preview_rows: Option<usize>,
    output_file_name: Option<String>,
}

impl CleaningConfigBuilder {
    /// Set the absolute skewness above which the median is used.
    pub fn skew_threshold(mut self, threshold: f64) -> Self {
        self.skew_threshold = Some(threshold);
        self
    }

    /// Set the IQR multiplier for the clipping bounds.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the quartile rule for the clipping bounds.
    pub fn quartile_method(mut self, method: QuartileMethod) -> Self {
        self.quartile_method = Some(method);
        self
    }

    /// Set the policy for fully-missing columns.
    pub fn empty_column_policy(mut self, policy: EmptyColumnPolicy) -> Self {
        self.empty_column_policy = Some(policy);
        self
    }

    /// Replace the list of missing-value markers.
    pub fn missing_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }

    /// Set how many rows the CSV reader samples for schema inference.
    pub fn infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the number of rows in the preview.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the file name of the cleaned CSV.
    pub fn output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            skew_threshold: self.skew_threshold.unwrap_or(1.0),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(1.5),
            quartile_method: self.quartile_method.unwrap_or_default(),
            empty_column_policy: self.empty_column_policy.unwrap_or_default(),
            missing_markers: self.missing_markers.unwrap_or_else(default_missing_markers),
            infer_schema_length: self.infer_schema_length.unwrap_or(Some(1000)),
            histogram_bins: self.histogram_bins.unwrap_or(10),
            preview_rows: self.preview_rows.unwrap_or(5),
            output_file_name: self
                .output_file_name
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILE_NAME.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}
