//! Statistical imputation methods.
//!
//! Numeric gaps are filled with the mean, or the median when the present
//! values are skewed. Categorical gaps are filled with the first mode.

use crate::dataset::{Column, ColumnData, NumericValues};
use crate::error::{ProcessingError, Result};
use crate::profiler::statistics;
use crate::types::{FillValue, ImputationRecord, ImputationStrategy};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Pick the numeric strategy for a column with the given skewness.
    ///
    /// Undefined skewness counts as symmetric.
    pub fn numeric_strategy(skewness: Option<f64>, threshold: f64) -> ImputationStrategy {
        match skewness {
            Some(skew) if skew.abs() > threshold => ImputationStrategy::Median,
            _ => ImputationStrategy::Mean,
        }
    }

    /// Fill the gaps of any column.
    ///
    /// Returns `None` when the column had nothing to fill.
    pub fn impute_column(column: &mut Column, skew_threshold: f64) -> Result<Option<ImputationRecord>> {
        let name = column.name().to_string();
        match column.data_mut() {
            ColumnData::Numeric(values) => Self::impute_numeric(&name, values, skew_threshold),
            ColumnData::Categorical(values) => Self::impute_categorical(&name, values),
        }
    }

    /// Fill numeric gaps with the mean or, for skewed data, the median.
    ///
    /// Integer columns stay integer when the fill value is whole.
    pub fn impute_numeric(
        col_name: &str,
        values: &mut NumericValues,
        skew_threshold: f64,
    ) -> Result<Option<ImputationRecord>> {
        let missing = values.missing_count();
        if missing == 0 {
            return Ok(None);
        }

        let present = values.present();
        let skewness = statistics::skewness(&present);
        let strategy = Self::numeric_strategy(skewness, skew_threshold);

        let fill_value = match strategy {
            ImputationStrategy::Median => statistics::median(&present),
            _ => statistics::mean(&present),
        }
        .ok_or_else(|| ProcessingError::NoValidValues(col_name.to_string()))?;

        values.replace_with(|value| value.is_none().then_some(fill_value));

        Ok(Some(ImputationRecord {
            column: col_name.to_string(),
            strategy,
            fill_value: FillValue::Number(fill_value),
            filled: missing,
            skewness,
        }))
    }

    /// Fill categorical gaps with the most frequent value.
    pub fn impute_categorical(
        col_name: &str,
        values: &mut [Option<String>],
    ) -> Result<Option<ImputationRecord>> {
        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing == 0 {
            return Ok(None);
        }

        let mode = statistics::first_mode(values.iter().flatten().map(String::as_str))
            .map(str::to_string)
            .ok_or_else(|| ProcessingError::NoValidValues(col_name.to_string()))?;

        for value in values.iter_mut().filter(|v| v.is_none()) {
            *value = Some(mode.clone());
        }

        Ok(Some(ImputationRecord {
            column: col_name.to_string(),
            strategy: ImputationStrategy::Mode,
            fill_value: FillValue::Text(mode),
            filled: missing,
            skewness: None,
        }))
    }
}
