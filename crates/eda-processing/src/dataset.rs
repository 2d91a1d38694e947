//! In-memory dataset model.
//!
//! A [`Dataset`] is an ordered list of named [`Column`]s sharing one row
//! count. Each column carries its classification as a tagged variant
//! ([`ColumnData`]), so the cleaning code never inspects types at runtime.
//! Missing values are `None`.

use polars::prelude as pl;
use polars::prelude::NamedFrom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{ProcessingError, Result};
use crate::profiler::classify_column;

/// Classification of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point values.
    Numeric,
    /// Text, categorical or boolean values.
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Categorical => write!(f, "categorical"),
        }
    }
}

/// Values of a column, tagged by classification.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Numeric values in their source representation.
    Numeric(NumericValues),
    /// Categorical values.
    Categorical(Vec<Option<String>>),
}

/// Storage for a numeric column.
///
/// Integer columns keep their exact values; statistics see them through an
/// `f64` view. A column only becomes `Float` when a fill or a clipping
/// bound writes a value the integer storage cannot hold.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericValues {
    Int(Vec<Option<i64>>),
    UInt(Vec<Option<u64>>),
    Float(Vec<Option<f64>>),
}

// 2^63 and 2^64, exact as f64
const I64_END: f64 = 9_223_372_036_854_775_808.0;
const U64_END: f64 = 18_446_744_073_709_551_616.0;

impl NumericValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(values) => values.len(),
            Self::UInt(values) => values.len(),
            Self::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for integer storage.
    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::Float(_))
    }

    /// One cell as `f64`, `None` when missing.
    pub fn get(&self, row: usize) -> Option<f64> {
        match self {
            Self::Int(values) => values.get(row).copied().flatten().map(|v| v as f64),
            Self::UInt(values) => values.get(row).copied().flatten().map(|v| v as f64),
            Self::Float(values) => values.get(row).copied().flatten(),
        }
    }

    /// All cells as `f64`. Integers above 2^53 are rounded.
    pub fn to_f64(&self) -> Vec<Option<f64>> {
        (0..self.len()).map(|row| self.get(row)).collect()
    }

    /// Present cells as `f64`.
    pub fn present(&self) -> Vec<f64> {
        (0..self.len()).filter_map(|row| self.get(row)).collect()
    }

    pub fn missing_count(&self) -> usize {
        match self {
            Self::Int(values) => values.iter().filter(|v| v.is_none()).count(),
            Self::UInt(values) => values.iter().filter(|v| v.is_none()).count(),
            Self::Float(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    fn unique_count(&self) -> usize {
        match self {
            Self::Int(values) => values.iter().flatten().collect::<HashSet<_>>().len(),
            Self::UInt(values) => values.iter().flatten().collect::<HashSet<_>>().len(),
            Self::Float(values) => values
                .iter()
                .flatten()
                .map(|v| v.to_bits())
                .collect::<HashSet<_>>()
                .len(),
        }
    }

    fn display(&self, row: usize) -> Option<String> {
        match self {
            Self::Int(values) => values.get(row).copied().flatten().map(|v| v.to_string()),
            Self::UInt(values) => values.get(row).copied().flatten().map(|v| v.to_string()),
            Self::Float(values) => values.get(row).copied().flatten().map(|v| format!("{}", v)),
        }
    }

    fn head(&self, rows: usize) -> Self {
        match self {
            Self::Int(values) => Self::Int(values.iter().take(rows).copied().collect()),
            Self::UInt(values) => Self::UInt(values.iter().take(rows).copied().collect()),
            Self::Float(values) => Self::Float(values.iter().take(rows).copied().collect()),
        }
    }

    fn to_series(&self, name: pl::PlSmallStr) -> pl::Series {
        match self {
            Self::Int(values) => pl::Series::new(name, values.as_slice()),
            Self::UInt(values) => pl::Series::new(name, values.as_slice()),
            Self::Float(values) => pl::Series::new(name, values.as_slice()),
        }
    }

    fn holds_exactly(&self, value: f64) -> bool {
        match self {
            Self::Int(_) => value.fract() == 0.0 && (-I64_END..I64_END).contains(&value),
            Self::UInt(_) => value.fract() == 0.0 && (0.0..U64_END).contains(&value),
            Self::Float(_) => true,
        }
    }

    /// Rewrite cells. `replace` sees every cell as `f64` and returns the new
    /// value for the cells it changes, `None` for the rest. Cells that are
    /// not replaced keep their stored value.
    ///
    /// Returns the number of replaced cells.
    pub(crate) fn replace_with<F>(&mut self, mut replace: F) -> usize
    where
        F: FnMut(Option<f64>) -> Option<f64>,
    {
        let changes: Vec<(usize, f64)> = (0..self.len())
            .filter_map(|row| replace(self.get(row)).map(|value| (row, value)))
            .collect();
        if changes.is_empty() {
            return 0;
        }

        if !changes.iter().all(|(_, value)| self.holds_exactly(*value)) {
            *self = Self::Float(self.to_f64());
        }
        match self {
            Self::Int(values) => {
                for &(row, value) in &changes {
                    values[row] = Some(value as i64);
                }
            }
            Self::UInt(values) => {
                for &(row, value) in &changes {
                    values[row] = Some(value as u64);
                }
            }
            Self::Float(values) => {
                for &(row, value) in &changes {
                    values[row] = Some(value);
                }
            }
        }
        changes.len()
    }
}

/// A named, classified column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a floating point numeric column. `NaN` is stored as missing.
    pub fn numeric(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(NumericValues::Float(normalize_floats(values))),
        }
    }

    /// Create a signed integer column.
    pub fn integer(name: impl Into<String>, values: impl IntoIterator<Item = Option<i64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(NumericValues::Int(values.into_iter().collect())),
        }
    }

    /// Create an unsigned integer column.
    pub fn unsigned(name: impl Into<String>, values: impl IntoIterator<Item = Option<u64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(NumericValues::UInt(values.into_iter().collect())),
        }
    }

    /// Create a categorical column.
    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values.into_iter().map(|v| v.map(Into::into)).collect()),
        }
    }

    /// Create a column from already classified data.
    pub fn from_data(name: impl Into<String>, data: ColumnData) -> Self {
        let data = match data {
            ColumnData::Numeric(NumericValues::Float(values)) => {
                ColumnData::Numeric(NumericValues::Float(normalize_floats(values)))
            }
            other => other,
        };
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    /// Numeric storage, or `None` for a categorical column.
    pub fn as_numeric(&self) -> Option<&NumericValues> {
        match &self.data {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Numeric values as `f64`, or `None` for a categorical column.
    pub fn numeric_values(&self) -> Option<Vec<Option<f64>>> {
        self.as_numeric().map(NumericValues::to_f64)
    }

    /// Categorical values, or `None` for a numeric column.
    pub fn categorical_values(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(values) => Some(values),
            ColumnData::Numeric(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn missing_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(values) => values.missing_count(),
            ColumnData::Categorical(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// True when the column has rows and every one of them is missing.
    pub fn is_fully_missing(&self) -> bool {
        !self.is_empty() && self.missing_count() == self.len()
    }

    /// Number of distinct non-missing values.
    pub fn unique_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(values) => values.unique_count(),
            ColumnData::Categorical(values) => {
                values.iter().flatten().collect::<HashSet<_>>().len()
            }
        }
    }

    /// Text rendering of one cell, `None` for a missing value.
    pub fn display_value(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Numeric(values) => values.display(row),
            ColumnData::Categorical(values) => values.get(row).cloned().flatten(),
        }
    }

    fn slice(&self, rows: usize) -> Self {
        let data = match &self.data {
            ColumnData::Numeric(values) => ColumnData::Numeric(values.head(rows)),
            ColumnData::Categorical(values) => {
                ColumnData::Categorical(values.iter().take(rows).cloned().collect())
            }
        };
        Self {
            name: self.name.clone(),
            data,
        }
    }

    /// Convert to a polars series: Int64, UInt64, Float64 or String.
    pub fn to_series(&self) -> pl::Series {
        let name = pl::PlSmallStr::from(self.name.as_str());
        match &self.data {
            ColumnData::Numeric(values) => values.to_series(name),
            ColumnData::Categorical(values) => pl::Series::new(name, values.as_slice()),
        }
    }
}

fn normalize_floats(values: impl IntoIterator<Item = Option<f64>>) -> Vec<Option<f64>> {
    values
        .into_iter()
        .map(|v| v.filter(|v| !v.is_nan()))
        .collect()
}

/// An ordered collection of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset, checking row counts and column names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        let expected = columns.first().map(Column::len).unwrap_or(0);

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(ProcessingError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != expected {
                return Err(ProcessingError::LengthMismatch {
                    column: column.name().to_string(),
                    expected,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns })
    }

    /// Classify every column of a polars frame.
    ///
    /// Fails on the first column whose dtype is neither numeric nor
    /// categorical.
    pub fn from_dataframe(df: &pl::DataFrame) -> Result<Self> {
        let columns = df
            .get_columns()
            .iter()
            .map(classify_column)
            .collect::<Result<Vec<_>>>()?;
        Self::new(columns)
    }

    /// Convert back to a polars frame, preserving column order.
    pub fn to_dataframe(&self) -> Result<pl::DataFrame> {
        let columns: Vec<pl::Column> = self
            .columns
            .iter()
            .map(|column| pl::Column::from(column.to_series()))
            .collect();
        Ok(pl::DataFrame::new(columns)?)
    }

    pub fn height(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ProcessingError::ColumnNotFound(name.to_string()))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
            .map(Column::name)
            .collect()
    }

    pub fn categorical_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Categorical)
            .map(Column::name)
            .collect()
    }

    /// Total number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// The first `rows` rows.
    pub fn head(&self, rows: usize) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.slice(rows)).collect(),
        }
    }

    /// Text preview of the first `rows` rows.
    pub fn preview(&self, rows: usize) -> DatasetPreview {
        let head = self.head(rows);
        let rows = (0..head.height())
            .map(|row| head.columns.iter().map(|c| c.display_value(row)).collect())
            .collect();

        DatasetPreview {
            columns: self.column_names().iter().map(|s| s.to_string()).collect(),
            rows,
            total_rows: self.height(),
        }
    }
}

/// First rows of a dataset rendered as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    pub total_rows: usize,
}
