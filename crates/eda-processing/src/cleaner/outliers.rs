//! Outlier handling module.
//!
//! Clips numeric values to the IQR fences of their column.

use tracing::debug;

use crate::dataset::{Column, ColumnData, NumericValues};
use crate::profiler::statistics::{self, IqrBounds, QuartileMethod};
use crate::types::ClippingRecord;

/// Handles outlier detection and treatment.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Clip a numeric column to `[Q1 - k*IQR, Q3 + k*IQR]`.
    ///
    /// Returns `None` for categorical columns and for numeric columns
    /// without any present value. Missing values are left as they are.
    pub fn clip_column(
        column: &mut Column,
        multiplier: f64,
        method: QuartileMethod,
    ) -> Option<ClippingRecord> {
        let name = column.name().to_string();
        match column.data_mut() {
            ColumnData::Numeric(values) => Self::clip_values(&name, values, multiplier, method),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Clip values in place, quartiles taken on the values as given.
    ///
    /// Integer columns stay integer unless a fence is fractional and some
    /// value lies beyond it.
    pub fn clip_values(
        col_name: &str,
        values: &mut NumericValues,
        multiplier: f64,
        method: QuartileMethod,
    ) -> Option<ClippingRecord> {
        let sorted = statistics::sorted(&values.present());
        let bounds = IqrBounds::with_method(&sorted, multiplier, method)?;

        let mut clipped_low = 0;
        let mut clipped_high = 0;
        values.replace_with(|value| match value {
            Some(v) if v < bounds.lower => {
                clipped_low += 1;
                Some(bounds.lower)
            }
            Some(v) if v > bounds.upper => {
                clipped_high += 1;
                Some(bounds.upper)
            }
            _ => None,
        });

        debug!(
            "Clipped '{}' to [{:.4}, {:.4}]: {} low, {} high",
            col_name, bounds.lower, bounds.upper, clipped_low, clipped_high
        );

        Some(ClippingRecord {
            column: col_name.to_string(),
            q1: bounds.q1,
            q3: bounds.q3,
            lower_bound: bounds.lower,
            upper_bound: bounds.upper,
            clipped_low,
            clipped_high,
        })
    }
}
