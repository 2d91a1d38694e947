use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::ColumnKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub null_count: usize,
    pub null_percentage: f64,
    pub unique_count: usize,
    /// Sample skewness of the present values (numeric columns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skewness: Option<f64>,
    /// Strategy the cleaner will use to fill this column's gaps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_imputation: Option<ImputationStrategy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub shape: (usize, usize),
    pub column_profiles: Vec<ColumnProfile>,
    pub missing_cells: usize,
}

// ============================================================================
// Cleaning Summary Types
// ============================================================================

/// How a column's missing values were filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationStrategy {
    /// Arithmetic mean of the present values.
    Mean,
    /// Median of the present values (skewed columns).
    Median,
    /// Most frequent value, first seen on ties.
    Mode,
}

impl ImputationStrategy {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
        }
    }
}

impl fmt::Display for ImputationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Value written into the gaps of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// One imputed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationRecord {
    pub column: String,
    pub strategy: ImputationStrategy,
    pub fill_value: FillValue,
    /// Number of cells filled.
    pub filled: usize,
    /// Skewness that drove the numeric choice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skewness: Option<f64>,
}

/// One clipped numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClippingRecord {
    pub column: String,
    pub q1: f64,
    pub q3: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Values raised to the lower bound.
    pub clipped_low: usize,
    /// Values lowered to the upper bound.
    pub clipped_high: usize,
}

impl ClippingRecord {
    pub fn total_clipped(&self) -> usize {
        self.clipped_low + self.clipped_high
    }
}

/// What a cleaning run did.
///
/// Serialized into the run report and printed by the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    pub rows: usize,
    pub columns: usize,

    /// Missing cells before imputation.
    pub missing_before: usize,
    /// Missing cells after imputation. Zero unless empty columns are kept.
    pub missing_after: usize,

    pub imputations: Vec<ImputationRecord>,
    pub clipping: Vec<ClippingRecord>,

    /// Human-readable log of the steps taken.
    pub steps: Vec<String>,
    pub warnings: Vec<String>,
}

impl CleaningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Cells filled across all columns.
    pub fn values_imputed(&self) -> usize {
        self.imputations.iter().map(|r| r.filled).sum()
    }

    /// Values moved to a bound across all columns.
    pub fn values_clipped(&self) -> usize {
        self.clipping.iter().map(ClippingRecord::total_clipped).sum()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_default() {
        let summary = CleaningSummary::default();
        assert_eq!(summary.duration_ms, 0);
        assert!(summary.imputations.is_empty());
        assert_eq!(summary.values_imputed(), 0);
    }

    #[test]
    fn test_summary_totals() {
        let mut summary = CleaningSummary::new();
        summary.imputations.push(ImputationRecord {
            column: "age".to_string(),
            strategy: ImputationStrategy::Median,
            fill_value: FillValue::Number(32.0),
            filled: 3,
            skewness: Some(1.7),
        });
        summary.imputations.push(ImputationRecord {
            column: "city".to_string(),
            strategy: ImputationStrategy::Mode,
            fill_value: FillValue::Text("Oslo".to_string()),
            filled: 2,
            skewness: None,
        });
        summary.clipping.push(ClippingRecord {
            column: "age".to_string(),
            q1: 20.0,
            q3: 40.0,
            lower_bound: -10.0,
            upper_bound: 70.0,
            clipped_low: 0,
            clipped_high: 4,
        });
        summary.add_warning("kept empty column");

        assert_eq!(summary.values_imputed(), 5);
        assert_eq!(summary.values_clipped(), 4);
        assert_eq!(summary.warnings.len(), 1);
    }

    #[test]
    fn test_strategy_serialization() {
        let json = serde_json::to_string(&ImputationStrategy::Median).expect("Should serialize");
        assert_eq!(json, "\"median\"");
        assert_eq!(ImputationStrategy::Mode.to_string(), "mode");
    }

    #[test]
    fn test_fill_value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&FillValue::Number(2.5)).unwrap(), "2.5");
        assert_eq!(
            serde_json::to_string(&FillValue::Text("a".to_string())).unwrap(),
            "\"a\""
        );
        assert_eq!(FillValue::Text("a".to_string()).to_string(), "'a'");
    }
}
