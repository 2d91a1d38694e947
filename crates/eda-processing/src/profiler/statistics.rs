//! Descriptive statistics used by the cleaner and the chart builders.
//!
//! All functions work on the non-missing values of a column and return
//! `None` when the statistic is undefined for the input.

use polars::prelude::{NamedFrom, PlSmallStr, Series};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Copy the present values of a column.
pub fn present_values(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

/// Sorted copy of `values`.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    Series::new(PlSmallStr::EMPTY, values).mean()
}

/// Quantile of already sorted values, interpolating linearly between the
/// two closest order statistics.
pub fn quantile_sorted(sorted: &[f64], quantile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = quantile.clamp(0.0, 1.0) * (sorted.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Quantile of already sorted values: the smallest value with at least
/// `quantile * n` values at or below it.
pub fn quantile_nearest_rank(sorted: &[f64], quantile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (quantile.clamp(0.0, 1.0) * sorted.len() as f64).ceil() as usize;
    Some(sorted[rank.saturating_sub(1)])
}

pub fn median(values: &[f64]) -> Option<f64> {
    Series::new(PlSmallStr::EMPTY, values).median()
}

/// How the quartiles behind the clipping fences are taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuartileMethod {
    /// Order statistics (`quantile_nearest_rank`). Clipping a column to
    /// these fences leaves its quartiles where they were, so a second
    /// pass clips nothing.
    #[default]
    NearestRank,
    /// Linear interpolation at `q * (n - 1)`, the pandas default. Clipped
    /// data can yield tighter fences on the next pass.
    Linear,
}

impl QuartileMethod {
    pub fn quantile(self, sorted: &[f64], quantile: f64) -> Option<f64> {
        match self {
            Self::NearestRank => quantile_nearest_rank(sorted, quantile),
            Self::Linear => quantile_sorted(sorted, quantile),
        }
    }
}

/// Sample skewness (adjusted Fisher-Pearson coefficient, G1).
///
/// Undefined below three values. A constant column has skewness 0.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let mean = mean(values)?;
    let nf = n as f64;

    let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nf;
    if m2 == 0.0 {
        return Some(0.0);
    }
    let m3 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / nf;

    let g1 = m3 / m2.powf(1.5);
    Some(g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0))
}

/// Most frequent value. Ties go to the value seen first.
pub fn first_mode<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&'a str, (usize, usize)> = HashMap::new();
    for (idx, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, idx)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Value counts in descending order of count, ties in order of first
/// appearance.
pub fn value_counts<'a, I>(values: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<&'a str> = Vec::new();
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut entries: Vec<(&'a str, usize)> = order
        .into_iter()
        .map(|value| (value, counts.get(value).copied().unwrap_or(0)))
        .collect();
    // stable sort keeps first-appearance order among equal counts
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// Pearson correlation of paired values. Undefined when either side has
/// zero variance or fewer than two pairs exist.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

/// Quartiles and the fences derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Compute Q1, Q3 and the fences `Q1 - k*IQR`, `Q3 + k*IQR` with
    /// interpolated quartiles.
    pub fn from_sorted(sorted: &[f64], multiplier: f64) -> Option<Self> {
        Self::with_method(sorted, multiplier, QuartileMethod::Linear)
    }

    pub fn with_method(sorted: &[f64], multiplier: f64, method: QuartileMethod) -> Option<Self> {
        let q1 = method.quantile(sorted, 0.25)?;
        let q3 = method.quantile(sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    pub fn contains(&self, value: f64) -> bool {
        value.partial_cmp(&self.lower) != Some(Ordering::Less)
            && value.partial_cmp(&self.upper) != Some(Ordering::Greater)
    }
}
