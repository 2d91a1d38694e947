//! Visualization data for the cleaned dataset.
//!
//! Nothing is drawn here. [`VisualizationPlan::build`] computes the data
//! behind the fixed chart battery shown after cleaning:
//! - a histogram and a box plot per numeric column
//! - a correlation heatmap when there are at least two numeric columns
//! - a bar chart of value counts per categorical column
//! - box plots of every numeric column grouped by the categorical column
//!   with the fewest distinct values

mod charts;

pub use charts::{
    BarChart, BoxGroup, BoxPlot, BoxPlotSummary, CategoryCount, CorrelationMatrix,
    GroupedBoxPlot, Histogram, HistogramBin, build_bar_chart, build_box_plot,
    build_correlation_matrix, build_grouped_box_plot, build_histogram,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{Column, Dataset};
use crate::profiler::statistics;

/// Chart data for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationPlan {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub histograms: Vec<Histogram>,
    pub box_plots: Vec<BoxPlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationMatrix>,
    pub bar_charts: Vec<BarChart>,
    pub grouped_box_plots: Vec<GroupedBoxPlot>,
}

impl VisualizationPlan {
    /// Build the chart data for `dataset` with `bins` histogram bins.
    pub fn build(dataset: &Dataset, bins: usize) -> Self {
        let numeric: Vec<(&str, Vec<Option<f64>>)> = dataset
            .columns()
            .iter()
            .filter_map(|c| c.numeric_values().map(|values| (c.name(), values)))
            .collect();
        let categorical: Vec<(&Column, &[Option<String>])> = dataset
            .columns()
            .iter()
            .filter_map(|c| c.categorical_values().map(|values| (c, values)))
            .collect();

        let mut histograms = Vec::with_capacity(numeric.len());
        let mut box_plots = Vec::with_capacity(numeric.len());
        for (name, values) in &numeric {
            let present = statistics::present_values(values);
            histograms.push(Histogram {
                column: name.to_string(),
                bins: build_histogram(&present, bins),
            });
            if let Some(summary) = build_box_plot(&present) {
                box_plots.push(BoxPlot {
                    column: name.to_string(),
                    summary,
                });
            }
        }

        let correlation = (numeric.len() > 1).then(|| {
            let columns: Vec<(&str, &[Option<f64>])> = numeric
                .iter()
                .map(|(name, values)| (*name, values.as_slice()))
                .collect();
            build_correlation_matrix(&columns)
        });

        let bar_charts: Vec<BarChart> = categorical
            .iter()
            .map(|(column, values)| build_bar_chart(column.name(), values))
            .collect();

        // min_by_key keeps the first column on ties
        let grouping = categorical
            .iter()
            .min_by_key(|(column, _)| column.unique_count());
        let grouped_box_plots: Vec<GroupedBoxPlot> = match grouping {
            Some((group_column, labels)) => numeric
                .iter()
                .map(|(name, values)| {
                    build_grouped_box_plot(name, values, group_column.name(), labels)
                })
                .collect(),
            None => Vec::new(),
        };

        debug!(
            "Built chart data: {} histograms, {} bar charts, {} grouped box plots",
            histograms.len(),
            bar_charts.len(),
            grouped_box_plots.len()
        );

        Self {
            numeric_columns: numeric.iter().map(|(name, _)| name.to_string()).collect(),
            categorical_columns: categorical
                .iter()
                .map(|(column, _)| column.name().to_string())
                .collect(),
            histograms,
            box_plots,
            correlation,
            bar_charts,
            grouped_box_plots,
        }
    }

    /// Total number of charts in the plan.
    pub fn chart_count(&self) -> usize {
        self.histograms.len()
            + self.box_plots.len()
            + usize::from(self.correlation.is_some())
            + self.bar_charts.len()
            + self.grouped_box_plots.len()
    }
}
