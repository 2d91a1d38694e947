//! CLI entry point for the dataset cleaner.
//!
//! Stands in for the upload widget and the download button: reads a CSV,
//! cleans it, prints a preview and writes `cleaned_data.csv`.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use eda_processing::{
    CleaningConfig, CleaningSummary, DataProfiler, EmptyColumnPolicy, Pipeline,
    ProcessedDataset, QuartileMethod, ReportGenerator, io,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// CLI-compatible empty column policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEmptyColumnPolicy {
    /// Abort the run when a column has no values at all
    Fail,
    /// Leave such columns untouched and record a warning
    Keep,
}

impl From<CliEmptyColumnPolicy> for EmptyColumnPolicy {
    fn from(cli: CliEmptyColumnPolicy) -> Self {
        match cli {
            CliEmptyColumnPolicy::Fail => EmptyColumnPolicy::Fail,
            CliEmptyColumnPolicy::Keep => EmptyColumnPolicy::Keep,
        }
    }
}

/// CLI-compatible quartile rule for the clipping fences
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliQuartileMethod {
    /// Order statistics; cleaning twice gives the same result
    NearestRank,
    /// Linear interpolation, as pandas computes quartiles
    Linear,
}

impl From<CliQuartileMethod> for QuartileMethod {
    fn from(cli: CliQuartileMethod) -> Self {
        match cli {
            CliQuartileMethod::NearestRank => QuartileMethod::NearestRank,
            CliQuartileMethod::Linear => QuartileMethod::Linear,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Automatic dataset cleaning and exploratory chart data",
    long_about = "Cleans a CSV dataset and prepares exploratory chart data.\n\n\
                  Missing numeric values are filled with the median when the column is\n\
                  skewed and with the mean otherwise; missing categorical values get the\n\
                  most frequent value. Numeric columns are then clipped to their IQR fences.\n\n\
                  EXAMPLES:\n  \
                  # Clean a file into ./outputs/cleaned_data.csv\n  \
                  eda-processing -i data.csv\n\n  \
                  # Preview what would be filled\n  \
                  eda-processing -i data.csv --dry-run\n\n  \
                  # Machine-readable report including chart data\n  \
                  eda-processing -i data.csv --json --emit-visuals"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: String,

    /// Output directory for the cleaned CSV and reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Profile the dataset and show planned imputations without cleaning
    #[arg(long)]
    dry_run: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Write the chart data to <input_name>_visuals.json
    #[arg(long)]
    emit_visuals: bool,

    /// What to do with columns that have no values at all
    #[arg(long, value_enum, default_value = "fail")]
    empty_columns: CliEmptyColumnPolicy,

    /// Absolute skewness above which the median replaces the mean
    #[arg(long, default_value = "1.0")]
    skew_threshold: f64,

    /// IQR multiplier for the clipping fences
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Quartile rule for the clipping fences
    #[arg(long, value_enum, default_value = "nearest-rank")]
    quartiles: CliQuartileMethod,

    /// Number of histogram bins
    #[arg(long, default_value = "10")]
    bins: usize,

    /// Number of cleaned rows to preview
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error processing file: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = CleaningConfig::builder()
        .skew_threshold(args.skew_threshold)
        .iqr_multiplier(args.iqr_multiplier)
        .quartile_method(args.quartiles.into())
        .empty_column_policy(args.empty_columns.into())
        .histogram_bins(args.bins)
        .preview_rows(args.preview_rows)
        .build()?;

    if args.dry_run {
        return run_dry_run(args, &config);
    }

    let input = Path::new(&args.input);
    let output_dir = PathBuf::from(&args.output);
    let input_stem = extract_file_stem(&args.input);

    // the profile describes the upload before cleaning
    let profile = if args.json || args.emit_report {
        Some(DataProfiler::profile_dataset(
            &io::load_dataset(input, &config)?,
            &config,
        ))
    } else {
        None
    };

    let mut builder = Pipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let processed = builder.build()?.process_file(input)?;

    let output_path = processed.write_csv(&output_dir)?;
    let output_file = output_path.display().to_string();

    let generator = ReportGenerator::new(output_dir.clone());
    if args.emit_visuals {
        generator.write_visuals_to_file(&processed.visuals, &input_stem)?;
    }

    if let Some(profile) = profile {
        let report = ReportGenerator::build_report(
            &args.input,
            Some(&output_file),
            profile,
            &processed,
            args.emit_visuals,
        );

        if args.emit_report {
            let report_path = generator.write_report_to_file(&report, &input_stem)?;
            info!("Report written to: {}", report_path.display());
        }

        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }
    }

    print_human_readable_summary(args, &processed, &output_file)?;
    Ok(())
}

/// Run dry-run mode - show what would happen without cleaning
///
/// Uses `println!` on purpose: this output is the point of `--dry-run`
/// and must show regardless of the log level.
fn run_dry_run(args: &Args, config: &CleaningConfig) -> Result<()> {
    let dataset = io::load_dataset(Path::new(&args.input), config)?;
    let profile = DataProfiler::profile_dataset(&dataset, config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of cleaning actions");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    println!("  Rows: {}", profile.shape.0);
    println!("  Columns: {}", profile.shape.1);
    println!("  Missing cells: {}", profile.missing_cells);
    println!();

    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<12} {:<10} {:<8} {:<10} {:<10}",
        "Column", "Type", "Missing %", "Unique", "Skewness", "Fill"
    );
    println!("{}", "-".repeat(74));

    for col in &profile.column_profiles {
        let skewness = col
            .skewness
            .map(|s| format!("{:.3}", s))
            .unwrap_or_else(|| "-".to_string());
        let fill = col
            .planned_imputation
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:<12} {:<10.1} {:<8} {:<10} {:<10}",
            truncate_str(&col.name, 19),
            col.kind.to_string(),
            col.null_percentage,
            col.unique_count,
            skewness,
            fill
        );
    }
    println!();

    let empty_columns: Vec<&str> = profile
        .column_profiles
        .iter()
        .filter(|col| profile.shape.0 > 0 && col.null_count == profile.shape.0)
        .map(|col| col.name.as_str())
        .collect();
    if !empty_columns.is_empty() {
        println!("WARNING");
        println!("{}", "-".repeat(40));
        println!(
            "  Columns without any values ({:?} policy): {:?}",
            config.empty_column_policy, empty_columns
        );
        println!();
    }

    println!("OUTPUT FILES (will be created)");
    println!("{}", "-".repeat(40));
    println!("  - {}/{}", args.output, config.output_file_name);
    let input_stem = extract_file_stem(&args.input);
    if args.emit_report {
        println!("  - {}/{}_report.json", args.output, input_stem);
    }
    if args.emit_visuals {
        println!("  - {}/{}_visuals.json", args.output, input_stem);
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("To clean the dataset, run without --dry-run");
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Print the success line, a preview of the cleaned rows and a summary.
fn print_human_readable_summary(
    args: &Args,
    processed: &ProcessedDataset,
    output_file: &str,
) -> Result<()> {
    let summary: &CleaningSummary = &processed.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("File uploaded and processed successfully!");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input, summary.rows, summary.columns
    );
    println!("Output: {}", output_file);
    println!();

    println!("Cleaned Data (first {} rows):", args.preview_rows);
    let preview = processed.to_dataframe()?.head(Some(args.preview_rows));
    println!("{}", preview);
    println!();

    println!("Cleaning Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Missing values: {} -> {}",
        summary.missing_before, summary.missing_after
    );
    println!("  Values imputed: {}", summary.values_imputed());
    println!("  Values clipped: {}", summary.values_clipped());
    println!("  Charts prepared: {}", processed.visuals.chart_count());
    println!();

    if !summary.steps.is_empty() {
        println!("Actions Taken:");
        for step in summary.steps.iter().take(10) {
            println!("  - {}", step);
        }
        if summary.steps.len() > 10 {
            println!("  ... and {} more actions", summary.steps.len() - 10);
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

