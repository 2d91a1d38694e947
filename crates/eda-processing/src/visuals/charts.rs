//! Chart data builders.
//!
//! Each builder works on already cleaned values and returns plain,
//! serializable data for a plotting layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::profiler::statistics::{self, IqrBounds};

/// Histogram bin with an inclusive start and exclusive end (the last bin
/// also includes its end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

/// Box plot summary values for numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value not below `Q1 - 1.5*IQR`.
    pub lower_whisker: f64,
    /// Largest value not above `Q3 + 1.5*IQR`.
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending.
    pub fliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlot {
    pub column: String,
    pub summary: BoxPlotSummary,
}

/// Pearson correlation heatmap. `None` marks an undefined coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, x: &str, y: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == x)?;
        let j = self.labels.iter().position(|l| l == y)?;
        self.values[i][j]
    }
}

/// Simple category count entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub column: String,
    pub counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    pub group: String,
    pub summary: BoxPlotSummary,
}

/// Distribution of a numeric column split by the labels of a categorical
/// column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedBoxPlot {
    pub numeric_column: String,
    pub group_column: String,
    pub groups: Vec<BoxGroup>,
}

/// Equal-width bins over `[min, max]`.
///
/// A constant column is binned over `[v - 0.5, v + 0.5]`.
pub fn build_histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let sorted = statistics::sorted(values);
    let mut min = sorted[0];
    let mut max = sorted[sorted.len() - 1];
    if max == min {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];

    for value in &sorted {
        let mut index = ((value - min) / width) as usize;
        if index >= bins {
            index = bins - 1;
        }
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: if idx + 1 == bins {
                max
            } else {
                min + (idx as f64 + 1.0) * width
            },
            count,
        })
        .collect()
}

/// Five-number summary with 1.5·IQR whiskers.
pub fn build_box_plot(values: &[f64]) -> Option<BoxPlotSummary> {
    let sorted = statistics::sorted(values);
    let bounds = IqrBounds::from_sorted(&sorted, 1.5)?;
    let median = statistics::quantile_sorted(&sorted, 0.5)?;

    let inside: Vec<f64> = sorted.iter().copied().filter(|v| bounds.contains(*v)).collect();
    let fliers: Vec<f64> = sorted.iter().copied().filter(|v| !bounds.contains(*v)).collect();

    Some(BoxPlotSummary {
        min: sorted[0],
        q1: bounds.q1,
        median,
        q3: bounds.q3,
        max: sorted[sorted.len() - 1],
        // quartiles always lie inside the fences
        lower_whisker: inside.first().copied().unwrap_or(bounds.q1),
        upper_whisker: inside.last().copied().unwrap_or(bounds.q3),
        fliers,
    })
}

/// Pairwise Pearson correlations over rows where both values are present.
pub fn build_correlation_matrix(columns: &[(&str, &[Option<f64>])]) -> CorrelationMatrix {
    let size = columns.len();
    let mut values = vec![vec![None; size]; size];

    for i in 0..size {
        for j in i..size {
            let (x, y): (Vec<f64>, Vec<f64>) = columns[i]
                .1
                .iter()
                .zip(columns[j].1.iter())
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();

            let estimate = statistics::pearson(&x, &y);
            values[i][j] = estimate;
            values[j][i] = estimate;
        }
    }

    CorrelationMatrix {
        labels: columns.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}

/// Value counts, most frequent first.
pub fn build_bar_chart(column: &str, values: &[Option<String>]) -> BarChart {
    let counts = statistics::value_counts(values.iter().flatten().map(String::as_str))
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect();

    BarChart {
        column: column.to_string(),
        counts,
    }
}

/// One box plot per group label, groups in label order. Rows missing
/// either value are skipped.
pub fn build_grouped_box_plot(
    numeric_column: &str,
    values: &[Option<f64>],
    group_column: &str,
    labels: &[Option<String>],
) -> GroupedBoxPlot {
    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (value, label) in values.iter().zip(labels) {
        if let (Some(value), Some(label)) = (value, label) {
            grouped.entry(label.as_str()).or_default().push(*value);
        }
    }

    let groups = grouped
        .into_iter()
        .filter_map(|(group, values)| {
            build_box_plot(&values).map(|summary| BoxGroup {
                group: group.to_string(),
                summary,
            })
        })
        .collect();

    GroupedBoxPlot {
        numeric_column: numeric_column.to_string(),
        group_column: group_column.to_string(),
        groups,
    }
}
