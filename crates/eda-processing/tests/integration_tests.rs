//! Integration tests for the cleaning pipeline.
//!
//! These tests verify end-to-end behavior of the pipeline using the CSV
//! fixtures in `tests/fixtures`.

use eda_processing::{
    CleaningConfig, Column, DataProfiler, Dataset, DatasetCleaner, EmptyColumnPolicy, FillValue,
    ImputationStrategy, Pipeline, ProcessedDataset, ProcessingStage, ReportGenerator, io,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn process_fixture(filename: &str) -> ProcessedDataset {
    Pipeline::builder()
        .build()
        .unwrap()
        .process_file(fixtures_path().join(filename))
        .expect("Pipeline should complete successfully")
}

fn numeric(processed: &ProcessedDataset, name: &str) -> Vec<f64> {
    processed
        .dataset
        .column(name)
        .unwrap()
        .numeric_values()
        .expect("numeric column")
        .into_iter()
        .map(|v| v.expect("no missing values after cleaning"))
        .collect()
}

fn text(processed: &ProcessedDataset, name: &str) -> Vec<String> {
    processed
        .dataset
        .column(name)
        .unwrap()
        .categorical_values()
        .expect("categorical column")
        .iter()
        .map(|v| v.clone().expect("no missing values after cleaning"))
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

// ============================================================================
// Cleaning Behavior
// ============================================================================

#[test]
fn test_skewed_and_symmetric_columns() {
    let processed = process_fixture("skewed.csv");

    // skewed: median 2.5 fills the gap, then 100 is clipped to Q3 + 1.5 * IQR
    assert_eq!(numeric(&processed, "x"), vec![1.0, 2.0, 3.0, 4.5, 2.5]);
    // symmetric: mean 2.5 fills the gap, nothing clipped
    assert_eq!(numeric(&processed, "y"), vec![1.0, 2.0, 3.0, 4.0, 2.5]);
    assert_eq!(text(&processed, "label"), vec!["a", "a", "b", "a", "c"]);

    let strategies: Vec<_> = processed
        .summary
        .imputations
        .iter()
        .map(|r| (r.column.as_str(), r.strategy))
        .collect();
    assert_eq!(
        strategies,
        vec![
            ("x", ImputationStrategy::Median),
            ("y", ImputationStrategy::Mean),
            ("label", ImputationStrategy::Mode),
        ]
    );
}

#[test]
fn test_mixed_dataset() {
    let processed = process_fixture("mixed.csv");

    assert_eq!(processed.dataset.shape(), (8, 5));
    assert_eq!(
        processed.dataset.column_names(),
        vec!["id", "age", "income", "city", "member"]
    );
    assert_eq!(processed.summary.missing_before, 5);
    assert_eq!(processed.summary.missing_after, 0);

    // "NA" is read as missing; age is not skewed so the mean is used
    let age = numeric(&processed, "age");
    assert_close(age[2], 200.0 / 6.0);
    assert_close(age[6], 200.0 / 6.0);

    // income is skewed by the 1,000,000 entry: median fill, then clipped
    let income = numeric(&processed, "income");
    assert_close(income[3], 55000.0);
    // Q1 = 47000, Q3 = 58000: upper fence 74500
    assert_close(income[5], 74500.0);
    assert_close(income[0], 40000.0);

    // Oslo and Rome both appear three times; Oslo is seen first
    assert_eq!(text(&processed, "city")[4], "Oslo");
    assert_eq!(text(&processed, "member")[3], "true");

    assert_eq!(numeric(&processed, "id"), (1..=8).map(f64::from).collect::<Vec<_>>());
}

#[test]
fn test_numeric_values_within_bounds_after_cleaning() {
    let processed = process_fixture("mixed.csv");

    for record in &processed.summary.clipping {
        for value in numeric(&processed, &record.column) {
            assert!(
                value >= record.lower_bound && value <= record.upper_bound,
                "{} out of [{}, {}] in '{}'",
                value,
                record.lower_bound,
                record.upper_bound,
                record.column
            );
        }
    }
    assert_eq!(processed.summary.values_clipped(), 1);
}

#[test]
fn test_quoted_fields_survive_round_trip() {
    let processed = process_fixture("quoted.csv");

    assert_eq!(text(&processed, "name")[0], "Smith, Anna");
    assert_eq!(text(&processed, "comment")[2], "said \"hello\"");
    // skewed column: median 81.5, then 90.25 clipped to 81.5 + 1.5 * 2.5
    let score = numeric(&processed, "score");
    assert_close(score[1], 81.5);
    assert_close(score[3], 85.25);

    let bytes = processed.to_csv_bytes().unwrap();
    let reread = io::read_csv_bytes(&bytes, &CleaningConfig::default()).unwrap();
    let reread = Dataset::from_dataframe(&reread).unwrap();

    assert_eq!(reread.shape(), processed.dataset.shape());
    assert_eq!(
        reread.column("comment").unwrap().categorical_values().unwrap()[3],
        Some("multi\nline".to_string())
    );
}

#[test]
fn test_recleaning_leaves_data_unchanged() {
    let processed = process_fixture("mixed.csv");

    let again = DatasetCleaner::default()
        .clean(processed.dataset.clone())
        .unwrap();

    assert!(again.summary.imputations.is_empty());
    assert_eq!(again.summary.values_clipped(), 0);
    assert_eq!(again.dataset, processed.dataset);
}

#[test]
fn test_large_integer_ids_survive_round_trip() {
    let csv = b"id,v\n9007199254740993,1\n9007199254740995,\n9007199254740997,3\n";
    let processed = Pipeline::builder().build().unwrap().process_bytes(csv).unwrap();

    let text = String::from_utf8(processed.to_csv_bytes().unwrap()).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "id,v",
            "9007199254740993,1",
            "9007199254740995,2",
            "9007199254740997,3",
        ]
    );
}

#[test]
fn test_unsigned_ids_beyond_i64_survive_round_trip() {
    let csv = b"id\n18446744073709551615\n18446744073709551613\n18446744073709551611\n";
    let processed = Pipeline::builder().build().unwrap().process_bytes(csv).unwrap();

    assert_eq!(processed.summary.values_clipped(), 0);
    let text = String::from_utf8(processed.to_csv_bytes().unwrap()).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "id",
            "18446744073709551615",
            "18446744073709551613",
            "18446744073709551611",
        ]
    );
}

#[test]
fn test_type_change_after_schema_sample() {
    let mut csv = String::from("n,label\n");
    for row in 0..1200 {
        let n = if row == 1100 { "2.5".to_string() } else { (row % 40).to_string() };
        let label = if row == 1150 { "" } else { "a" };
        csv.push_str(&format!("{},{}\n", n, label));
    }

    let processed = Pipeline::builder()
        .build()
        .unwrap()
        .process_bytes(csv.as_bytes())
        .unwrap();

    assert_eq!(processed.dataset.shape(), (1200, 2));
    assert_eq!(processed.dataset.missing_count(), 0);
    assert_close(numeric(&processed, "n")[1100], 2.5);
}

// ============================================================================
// Failure Handling
// ============================================================================

#[test]
fn test_fully_missing_column_fails_the_run() {
    let result = Pipeline::builder()
        .build()
        .unwrap()
        .process_file(fixtures_path().join("all_missing.csv"));

    let err = result.unwrap_err();
    assert_eq!(err.error_code(), "NO_VALID_VALUES");
    assert!(err.to_string().contains("'b'"));
}

#[test]
fn test_fully_missing_column_kept_when_configured() {
    let config = CleaningConfig::builder()
        .empty_column_policy(EmptyColumnPolicy::Keep)
        .build()
        .unwrap();

    let processed = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .process_file(fixtures_path().join("all_missing.csv"))
        .unwrap();

    assert_eq!(processed.summary.missing_after, 3);
    assert_eq!(processed.summary.warnings.len(), 1);
    assert_eq!(numeric(&processed, "a"), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_unsupported_column_type_fails_the_run() {
    let when = Series::new("when".into(), &[19_000i32, 19_001, 19_002])
        .cast(&DataType::Date)
        .unwrap();
    let value = Series::new("v".into(), &[1.0f64, 2.0, 3.0]);
    let df = DataFrame::new(vec![when.into(), value.into()]).unwrap();

    let err = Pipeline::builder().build().unwrap().process(df).unwrap_err();

    assert_eq!(err.error_code(), "UNSUPPORTED_COLUMN_TYPE");
    assert!(err.to_string().contains("when"));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = Pipeline::builder()
        .build()
        .unwrap()
        .process_file(fixtures_path().join("does_not_exist.csv"))
        .unwrap_err();

    assert_eq!(err.error_code(), "IO_ERROR");
}

#[test]
fn test_empty_upload_is_rejected() {
    let err = Pipeline::builder().build().unwrap().process_bytes(b"").unwrap_err();
    assert_eq!(err.error_code(), "EMPTY_INPUT");
}

#[test]
fn test_failed_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::builder().build().unwrap();

    let result = pipeline
        .process_file(fixtures_path().join("all_missing.csv"))
        .and_then(|processed| processed.write_csv(dir.path()));

    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

// ============================================================================
// Progress Reporting
// ============================================================================

#[test]
fn test_progress_callback_is_monotonic() {
    let progress = Arc::new(Mutex::new(Vec::new()));
    let progress_clone = progress.clone();
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();

    Pipeline::builder()
        .on_progress(move |update| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            progress_clone.lock().unwrap().push((update.stage, update.progress));
        })
        .build()
        .unwrap()
        .process_file(fixtures_path().join("mixed.csv"))
        .unwrap();

    let progress = progress.lock().unwrap();
    assert!(calls.load(Ordering::SeqCst) >= 10);
    assert!(progress.windows(2).all(|w| w[0].1 <= w[1].1));
    assert_eq!(progress.last().unwrap().0, ProcessingStage::Complete);
}

// ============================================================================
// Visualization Data
// ============================================================================

#[test]
fn test_visualization_plan_for_mixed_dataset() {
    let processed = process_fixture("mixed.csv");
    let visuals = &processed.visuals;

    assert_eq!(visuals.numeric_columns, vec!["id", "age", "income"]);
    assert_eq!(visuals.categorical_columns, vec!["city", "member"]);
    assert_eq!(visuals.histograms.len(), 3);
    assert_eq!(visuals.box_plots.len(), 3);
    assert_eq!(visuals.bar_charts.len(), 2);

    for histogram in &visuals.histograms {
        let total: usize = histogram.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 8, "histogram of '{}'", histogram.column);
    }

    let correlation = visuals.correlation.as_ref().expect("three numeric columns");
    assert_eq!(correlation.labels, vec!["id", "age", "income"]);
    assert_close(correlation.get("id", "id").unwrap(), 1.0);

    // member has 2 distinct values, city has 3
    assert_eq!(visuals.grouped_box_plots.len(), 3);
    assert!(visuals.grouped_box_plots.iter().all(|g| g.group_column == "member"));
    let groups: Vec<&str> = visuals.grouped_box_plots[0]
        .groups
        .iter()
        .map(|g| g.group.as_str())
        .collect();
    assert_eq!(groups, vec!["false", "true"]);

    let city = &visuals.bar_charts[0];
    assert_eq!(city.column, "city");
    assert_eq!(city.counts[0].value, "Oslo");
    assert_eq!(city.counts[0].count, 4);
}

#[test]
fn test_no_correlation_for_single_numeric_column() {
    let dataset = Dataset::new(vec![
        Column::numeric("x", [Some(1.0), Some(2.0), Some(3.0)]),
        Column::categorical("c", [Some("a"), Some("b"), Some("a")]),
    ])
    .unwrap();
    let df = dataset.to_dataframe().unwrap();

    let processed = Pipeline::builder().build().unwrap().process(df).unwrap();

    assert!(processed.visuals.correlation.is_none());
    assert_eq!(processed.visuals.grouped_box_plots.len(), 1);
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_write_cleaned_csv_with_fixed_name() {
    let dir = tempfile::tempdir().unwrap();
    let processed = process_fixture("skewed.csv");

    let path = processed.write_csv(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "cleaned_data.csv");
    assert_eq!(processed.file_name(), "cleaned_data.csv");

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .unwrap()
        .finish()
        .unwrap();

    assert_eq!(df.shape(), (5, 3));
    assert_eq!(df.column("x").unwrap().null_count(), 0);
    assert_eq!(df.column("label").unwrap().null_count(), 0);
}

#[test]
fn test_preview_rows() {
    let processed = process_fixture("mixed.csv");
    let preview = processed.preview();

    assert_eq!(preview.rows.len(), 5);
    assert_eq!(preview.total_rows, 8);
    assert_eq!(preview.columns.len(), 5);
    assert!(preview.rows.iter().flatten().all(Option::is_some));
}

#[test]
fn test_report_round_trip_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = CleaningConfig::default();
    let path = fixtures_path().join("skewed.csv");

    let raw = io::load_dataset(&path, &config).unwrap();
    let profile = DataProfiler::profile_dataset(&raw, &config);
    let processed = Pipeline::builder().build().unwrap().process_file(&path).unwrap();

    let report = ReportGenerator::build_report("skewed.csv", None, profile, &processed, true);
    let report_path = ReportGenerator::new(dir.path())
        .write_report_to_file(&report, "skewed")
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();

    assert_eq!(json["profile"]["missing_cells"], 3);
    assert_eq!(json["summary"]["imputations"][0]["strategy"], "median");
    assert_eq!(json["summary"]["imputations"][0]["fill_value"], 2.5);
    assert_eq!(json["summary"]["imputations"][2]["fill_value"], "a");
    assert_eq!(
        report.summary.imputations[2].fill_value,
        FillValue::Text("a".to_string())
    );
}
