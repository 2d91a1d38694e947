//! Column classification.
//!
//! Turns a polars column into a classified [`Column`]. The decision is
//! made from the dtype alone and is recomputed on every run.

use polars::prelude::*;

use crate::dataset::{Column as DatasetColumn, ColumnData, ColumnKind, NumericValues};
use crate::error::{ProcessingError, Result, ResultExt};

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Classify a dtype, or `None` when it is unsupported.
///
/// Booleans are categorical: they count as labels, not as quantities.
pub fn classify_dtype(dtype: &DataType) -> Option<ColumnKind> {
    if is_numeric_dtype(dtype) {
        return Some(ColumnKind::Numeric);
    }
    match dtype {
        DataType::String
        | DataType::Boolean
        | DataType::Null
        | DataType::Categorical(..)
        | DataType::Enum(..) => Some(ColumnKind::Categorical),
        _ => None,
    }
}

/// Classify a polars column and copy its values into the dataset model.
pub(crate) fn classify_column(column: &Column) -> Result<DatasetColumn> {
    let name = column.name().as_str();
    let dtype = column.dtype();
    let series = column.as_materialized_series();

    match classify_dtype(dtype) {
        Some(ColumnKind::Numeric) => {
            let values = numeric_values(name, series)?;
            Ok(DatasetColumn::from_data(name, ColumnData::Numeric(values)))
        }
        Some(ColumnKind::Categorical) => {
            let casted = series
                .cast(&DataType::String)
                .context(format!("Casting column '{}' to String", name))?;
            let values: Vec<Option<String>> = casted
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect();
            Ok(DatasetColumn::categorical(name, values))
        }
        None => Err(ProcessingError::UnsupportedColumnType {
            column: name.to_string(),
            dtype: format!("{:?}", dtype),
        }),
    }
}

/// Copy numeric values without widening integers to floats.
fn numeric_values(name: &str, series: &Series) -> Result<NumericValues> {
    let values = match series.dtype() {
        DataType::UInt64 => NumericValues::UInt(series.u64()?.into_iter().collect()),
        dtype if is_integer_dtype(dtype) => {
            let casted = series
                .cast(&DataType::Int64)
                .context(format!("Casting column '{}' to Int64", name))?;
            NumericValues::Int(casted.i64()?.into_iter().collect())
        }
        _ => {
            let casted = series
                .cast(&DataType::Float64)
                .context(format!("Casting column '{}' to Float64", name))?;
            NumericValues::Float(casted.f64()?.into_iter().collect())
        }
    };
    Ok(values)
}
