//! CSV input and output.
//!
//! Reading turns an uploaded CSV (a file on disk or the raw bytes of an
//! upload) into a classified [`Dataset`]. Writing serializes a dataset back
//! to CSV text for download.

use polars::prelude::*;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::CleaningConfig;
use crate::dataset::Dataset;
use crate::error::{ProcessingError, Result, ResultExt};

fn read_options(config: &CleaningConfig, infer_schema_length: Option<usize>) -> CsvReadOptions {
    let markers: Vec<PlSmallStr> = config
        .missing_markers
        .iter()
        .map(|m| PlSmallStr::from(m.as_str()))
        .collect();

    let parse_options = CsvParseOptions::default()
        .with_quote_char(Some(b'"'))
        .with_null_values(Some(NullValues::AllColumns(markers)));

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .with_parse_options(parse_options)
}

/// Parse with the configured schema sample, falling back to a full scan
/// and finally to reading every field as text and narrowing each column
/// to the first of Int64, UInt64 or Float64 that holds all of its values.
fn read_with_fallbacks<F>(source: &str, config: &CleaningConfig, read: F) -> Result<DataFrame>
where
    F: Fn(CsvReadOptions) -> PolarsResult<DataFrame>,
{
    // Strategy 1: schema inferred from the configured sample
    match read(read_options(config, config.infer_schema_length)) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Loading {} with sampled schema failed: {}", source, e);
        }
    }

    // Strategy 2: schema inferred from every row
    if config.infer_schema_length.is_some() {
        match read(read_options(config, None)) {
            Ok(df) => return Ok(df),
            Err(e) => {
                debug!("Loading {} with full schema scan failed: {}", source, e);
            }
        }
    }

    // Strategy 3: text first, numeric where every value parses
    let df = read(read_options(config, Some(0))).context(format!("Parsing {}", source))?;
    narrow_text_columns(df)
}

fn narrow_text_columns(df: DataFrame) -> Result<DataFrame> {
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .map(|column| {
            let series = column.as_materialized_series();
            if series.null_count() == series.len() {
                return column.clone();
            }
            for dtype in [DataType::Int64, DataType::UInt64, DataType::Float64] {
                if let Ok(narrowed) = series.strict_cast(&dtype) {
                    debug!("Column '{}' read as {}", column.name(), dtype);
                    return Column::from(narrowed);
                }
            }
            column.clone()
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Parse a CSV file into a polars frame.
pub fn read_csv_file(path: &Path, config: &CleaningConfig) -> Result<DataFrame> {
    let metadata = fs::metadata(path).context(format!("Opening '{}'", path.display()))?;
    if metadata.len() == 0 {
        return Err(ProcessingError::EmptyInput(path.display().to_string()));
    }

    let source = format!("'{}'", path.display());
    let df = read_with_fallbacks(&source, config, |options| {
        options
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
    })?;

    debug!("Read {} rows x {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}

/// Parse the raw bytes of an uploaded CSV into a polars frame.
pub fn read_csv_bytes(bytes: &[u8], config: &CleaningConfig) -> Result<DataFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ProcessingError::EmptyInput("uploaded file has no content".to_string()));
    }

    let df = read_with_fallbacks("uploaded CSV", config, |options| {
        options
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()
    })?;

    debug!("Read {} rows x {} columns from upload", df.height(), df.width());
    Ok(df)
}

/// Read and classify a CSV file.
pub fn load_dataset(path: &Path, config: &CleaningConfig) -> Result<Dataset> {
    Dataset::from_dataframe(&read_csv_file(path, config)?)
}

/// Serialize a dataset as CSV with a header row.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut df = dataset.to_dataframe()?;
    let mut buffer = Vec::new();

    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context("Writing CSV")?;

    Ok(buffer)
}

/// Write a dataset as `<dir>/<file_name>`, creating `dir` if needed.
pub fn write_csv(dataset: &Dataset, dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let output_path = dir.join(file_name);

    let mut df = dataset.to_dataframe()?;
    let mut file = File::create(&output_path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context(format!("Writing '{}'", output_path.display()))?;

    info!("Dataset saved: {}", output_path.display());
    Ok(output_path)
}
